use super::{Message, Role};

/// Persona prompt that opens every conversation.
pub const PERSONA_PROMPT: &str = "You are a helpful AI assistant.";

/// Ordered chat history for one session.
///
/// The first element is always the persona system message. It is never
/// removed; [`Conversation::reset`] replaces the whole sequence with a fresh
/// copy of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    persona: String,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_persona(PERSONA_PROMPT)
    }

    pub fn with_persona(persona: impl Into<String>) -> Self {
        let persona = persona.into();
        let messages = vec![Message::system(persona.clone())];
        Self { persona, messages }
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    pub fn reset(&mut self) {
        self.messages = vec![Message::system(self.persona.clone())];
    }

    /// Messages shown to the user: everything except system turns, in order.
    pub fn list_visible(&self) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| !m.role().is_system())
            .collect()
    }

    /// Full history, persona included, as sent to the model.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
