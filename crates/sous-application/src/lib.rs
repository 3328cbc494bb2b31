//! Application layer for Sous.
//!
//! Orchestrates the backend capabilities from `sous-core` into the kitchen
//! use cases: dish discovery, recipe expansion and the chef conversation.

pub mod conversation;
pub mod dish_discovery;
pub mod image_generation;
pub mod kitchen;
pub mod prompts;
pub mod recipe_expansion;
pub mod structured_generation;

#[cfg(test)]
mod test_support;

pub use conversation::{ConversationEvent, ConversationPhase, ConversationSession, SendOutcome};
pub use dish_discovery::DishDiscoveryOrchestrator;
pub use image_generation::ImageGenerationClient;
pub use kitchen::{Kitchen, Selection};
pub use recipe_expansion::{ExpandedRecipe, RecipeExpansionOrchestrator};
pub use structured_generation::StructuredGenerationClient;
