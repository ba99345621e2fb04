//! Submitted HTML forms and their conversion into validated payloads.

pub mod auth;
pub mod comments;
pub mod entries;
