//! Account registration and password login.

use chrono::Utc;

use crate::auth::{hash_password, reject_unknown_account, verify_password};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::NewUser;
use crate::forms::auth::{LoginFormPayload, RegisterFormPayload};
use crate::repository::errors::RepositoryError;
use crate::repository::{UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Create an account and return the identity to store in the session.
pub fn register<R>(payload: RegisterFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserWriter,
{
    let password_hash = hash_password(&payload.password).map_err(|e| {
        log::error!("Failed to hash password: {e}");
        ServiceError::Internal
    })?;

    let new_user = NewUser {
        username: payload.username,
        password_hash,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_user(&new_user) {
        Ok(user) => {
            log::info!("Registered user {}", user.username);
            Ok(AuthenticatedUser::from(&user))
        }
        Err(RepositoryError::Conflict(_)) => Err(ServiceError::Conflict(format!(
            "Username {} is already taken",
            new_user.username
        ))),
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Check credentials. Unknown users and wrong passwords fail identically.
pub fn login<R>(payload: LoginFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader,
{
    let user = match repo.get_user_by_username(&payload.username) {
        Ok(Some(user)) => user,
        Ok(None) => {
            reject_unknown_account(&payload.password);
            return Err(ServiceError::Validation(INVALID_CREDENTIALS.into()));
        }
        Err(e) => {
            log::error!("Failed to get user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if verify_password(&payload.password, &user.password_hash) {
        Ok(AuthenticatedUser::from(&user))
    } else {
        Err(ServiceError::Validation(INVALID_CREDENTIALS.into()))
    }
}
