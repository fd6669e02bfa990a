//! Type definitions

pub mod import;
pub mod messages;
pub mod person;

pub use import::*;
pub use messages::*;
pub use person::*;
