//! Password hashing and session identity of the logged-in user.

use std::future::{Ready, ready};
use std::sync::LazyLock;

use actix_identity::{Identity, IdentityExt};
use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngCore;
use thiserror::Error;

use crate::domain::auth::AuthenticatedUser;
use crate::routes::redirect;

/// Page unauthenticated visitors are sent to.
pub const LOGIN_URL: &str = "/login";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("failed to encode session identity: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to attach session identity: {0}")]
    Session(String),
}

/// Hash `password` with Argon2id and a random 16-byte salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check `password` against a stored PHC hash string. Malformed hashes never
/// verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash is malformed: {e}");
            false
        }
    }
}

/// Hash checked when the username is unknown, so a missing account costs
/// as much Argon2 work as a wrong password.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| match hash_password("unknown-account-placeholder") {
        Ok(hash) => Some(hash),
        Err(e) => {
            log::error!("Failed to prepare placeholder password hash: {e}");
            None
        }
    });

/// Run a full password verification that always fails.
pub fn reject_unknown_account(password: &str) {
    if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_deref() {
        verify_password(password, hash);
    }
}

/// Attach `user` to the session of `req`.
pub fn start_session(req: &HttpRequest, user: &AuthenticatedUser) -> Result<(), AuthError> {
    let id = serde_json::to_string(user)?;
    Identity::login(&req.extensions(), id).map_err(|e| AuthError::Session(e.to_string()))?;
    Ok(())
}

/// Rejection of [`AuthenticatedUser`] extraction: sends the visitor to the
/// login page.
#[derive(Debug, Error)]
#[error("login required")]
pub struct LoginRequired;

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        redirect(LOGIN_URL)
    }
}

fn current_user(req: &HttpRequest) -> Option<AuthenticatedUser> {
    let identity = req.get_identity().ok()?;
    let id = identity.id().ok()?;
    match serde_json::from_str(&id) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Discarding unreadable session identity: {e}");
            identity.logout();
            None
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(current_user(req).ok_or(LoginRequired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_hashed_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn salts_each_hash() {
        let first = hash_password("secret-pass").unwrap();
        let second = hash_password("secret-pass").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn unknown_account_check_uses_a_real_hash() {
        let hash = UNKNOWN_ACCOUNT_HASH.as_deref().unwrap();
        assert!(PasswordHash::new(hash).is_ok());
        assert!(!verify_password("correct horse", hash));
        reject_unknown_account("correct horse");
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-hash"));
    }
}
