use tracing::info;

use crate::domain::Conversation;

pub const CLEARED_NOTICE: &str = "Chat history cleared.";

/// Use case for "Clear Chat": drop every turn but the persona message.
pub struct ClearConversationUseCase;

impl ClearConversationUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, conversation: &mut Conversation) {
        let dropped = conversation.len().saturating_sub(1);
        conversation.reset();
        info!("Cleared conversation ({} turns removed)", dropped);
    }
}

impl Default for ClearConversationUseCase {
    fn default() -> Self {
        Self::new()
    }
}
