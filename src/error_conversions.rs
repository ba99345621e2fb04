//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service or repository error types, so
//! the `From` impls connecting them live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::auth::AuthFormError;
    use crate::forms::comments::CommentFormError;
    use crate::forms::entries::EntryFormError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<EntryFormError> for ServiceError {
        fn from(val: EntryFormError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<CommentFormError> for ServiceError {
        fn from(val: CommentFormError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<AuthFormError> for ServiceError {
        fn from(val: AuthFormError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }
}
