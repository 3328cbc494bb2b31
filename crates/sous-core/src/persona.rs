//! The kitchen assistant persona.

/// A fixed assistant identity that becomes a chat session's system
/// instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: &'static str,
    pub role: &'static str,
    pub background: &'static str,
    pub communication_style: &'static str,
}

impl Persona {
    pub fn system_instruction(&self) -> String {
        format!(
            "You are {}. {} {}",
            self.role, self.background, self.communication_style
        )
    }
}

/// Sous Chef: World-Class Chef Assistant
///
/// Helps with cooking techniques, ingredient substitutions and general
/// kitchen advice.
pub static CHEF_PERSONA: Persona = Persona {
    name: "Sous Chef",
    role: "a world-class Michelin-star chef assistant",
    background: "You help users with cooking techniques, ingredient substitutions, and general kitchen advice.",
    communication_style: "Keep your tone encouraging, professional, and helpful.",
};

/// First transcript entry of every conversation.
pub const CHEF_GREETING: &str =
    "Hello! I am your AI Sous Chef. How can I help you in the kitchen today?";

/// Shown in place of a reply whose stream failed.
pub const CHAT_FALLBACK_REPLY: &str = "I'm sorry, I encountered an issue. Please try again.";
