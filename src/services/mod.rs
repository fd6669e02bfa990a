//! Business logic services

pub mod import;
pub mod store;
