//! Diesel row models and their conversions into domain types.

pub mod category;
pub mod comment;
pub mod config;
pub mod entry;
pub mod tag;
pub mod user;
