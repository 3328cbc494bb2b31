//! Conversation domain module.
//!
//! - `message`: message types (`ChatRole`, `ChatMessage`)
//! - `transcript`: ordered history (`Transcript`)

mod message;
mod transcript;

pub use message::{ChatMessage, ChatRole};
pub use transcript::Transcript;
