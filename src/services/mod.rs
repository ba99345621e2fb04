pub use errors::{ServiceError, ServiceResult};

pub mod auth;
pub mod categories;
pub mod comments;
pub mod entries;
pub mod errors;
pub mod tags;
