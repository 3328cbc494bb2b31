//! Domain layer for Sous: kitchen records, conversation transcript, backend
//! capability traits, response schema validation and configuration.

pub mod backend;
pub mod config;
pub mod conversation;
pub mod error;
pub mod kitchen;
pub mod persona;
pub mod schema;

// Re-export common error type
pub use error::{Result, SousError};
