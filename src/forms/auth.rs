use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{TypeConstraintError, Username};

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginFormPayload {
    pub username: Username,
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirm: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterFormPayload {
    pub username: Username,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("Auth form validation failed: {0}")]
    Validation(String),
    #[error("Auth form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AuthFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AuthFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = AuthFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
        })
    }
}

impl TryFrom<RegisterForm> for RegisterFormPayload {
    type Error = AuthFormError;

    fn try_from(value: RegisterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_requires_matching_passwords() {
        let form = RegisterForm {
            username: "alice".into(),
            password: "correct horse".into(),
            password_confirm: "battery staple".into(),
        };
        assert!(RegisterFormPayload::try_from(form).is_err());
    }

    #[test]
    fn register_trims_username() {
        let form = RegisterForm {
            username: "  alice ".into(),
            password: "correct horse".into(),
            password_confirm: "correct horse".into(),
        };
        let payload = RegisterFormPayload::try_from(form).unwrap();
        assert_eq!(payload.username.as_str(), "alice");
    }
}
