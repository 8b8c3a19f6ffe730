use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::ChatClient;
use crate::domain::{ChatModel, Conversation, DomainError, ErrorDetail, Role};

/// Shown when the user presses Send without typing anything.
pub const EMPTY_INPUT_WARNING: &str = "Please enter a message.";

/// Result of a send that reached the inference client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Replied(String),
    /// The call failed; the transcript already holds the error text as an
    /// assistant turn.
    Failed(ErrorDetail),
}

impl SendOutcome {
    /// Text appended to the transcript for this outcome.
    pub fn transcript_text(&self) -> String {
        match self {
            SendOutcome::Replied(reply) => reply.clone(),
            SendOutcome::Failed(detail) => detail.transcript_text(),
        }
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        match self {
            SendOutcome::Replied(_) => None,
            SendOutcome::Failed(detail) => Some(detail),
        }
    }
}

/// Use case for one "Send" press: record the user turn, ask the model,
/// record its answer (or the failure) as the assistant turn.
pub struct SendMessageUseCase {
    chat_client: Arc<dyn ChatClient>,
    api_key: String,
}

impl SendMessageUseCase {
    pub fn new(chat_client: Arc<dyn ChatClient>, api_key: impl Into<String>) -> Self {
        Self {
            chat_client,
            api_key: api_key.into(),
        }
    }

    /// Blank input is rejected with [`DomainError::InvalidInput`] before
    /// anything is recorded or sent.
    pub async fn execute(
        &self,
        conversation: &mut Conversation,
        model: ChatModel,
        input: &str,
    ) -> Result<SendOutcome, DomainError> {
        if input.trim().is_empty() {
            return Err(DomainError::invalid_input(EMPTY_INPUT_WARNING));
        }

        conversation.append(Role::User, input);
        debug!(
            "Sending {} messages to {} ({} chars of new input)",
            conversation.len(),
            model,
            input.len()
        );

        let start_time = Instant::now();
        let outcome = match self
            .chat_client
            .complete(conversation.messages(), model, &self.api_key)
            .await
        {
            Ok(reply) => {
                info!(
                    "Received reply from {} in {:?} ({} chars)",
                    model,
                    start_time.elapsed(),
                    reply.len()
                );
                SendOutcome::Replied(reply)
            }
            Err(e) => {
                warn!("Completion with {} failed: {}", model, e);
                SendOutcome::Failed(e.detail())
            }
        };

        conversation.append(Role::Assistant, outcome.transcript_text());
        Ok(outcome)
    }
}
