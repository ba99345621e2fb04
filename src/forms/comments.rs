use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{CommentContent, TypeConstraintError};

#[derive(Debug, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentFormPayload {
    pub content: CommentContent,
}

#[derive(Debug, Error)]
pub enum CommentFormError {
    #[error("Comment form validation failed: {0}")]
    Validation(String),
    #[error("Comment form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CommentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CommentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CommentForm> for CommentFormPayload {
    type Error = CommentFormError;

    fn try_from(value: CommentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            content: CommentContent::new(value.content)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_blank_comments() {
        let empty = CommentForm {
            content: String::new(),
        };
        assert!(matches!(
            CommentFormPayload::try_from(empty),
            Err(CommentFormError::Validation(_))
        ));

        let blank = CommentForm {
            content: "   ".into(),
        };
        assert!(matches!(
            CommentFormPayload::try_from(blank),
            Err(CommentFormError::TypeConstraint(_))
        ));
    }

    #[test]
    fn accepts_comment_at_limit() {
        let form = CommentForm {
            content: "a".repeat(1000),
        };
        assert!(CommentFormPayload::try_from(form).is_ok());
    }
}
