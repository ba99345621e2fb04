//! Domain entities and value objects of the encyclopedia.

pub mod auth;
pub mod category;
pub mod comment;
pub mod entry;
pub mod tag;
pub mod types;
pub mod user;
