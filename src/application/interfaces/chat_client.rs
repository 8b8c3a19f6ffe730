use async_trait::async_trait;

use crate::domain::{ChatModel, DomainError, Message};

/// An interface for sending a conversation to a hosted LLM and receiving the
/// assistant's reply.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. Use cases stay decoupled from any particular provider or HTTP
/// client library.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send the full conversation (persona first) to `model` and return the
    /// reply text.
    ///
    /// Fails with [`DomainError::Api`] on a non-200 status,
    /// [`DomainError::Transport`] when no response arrives and
    /// [`DomainError::MalformedResponse`] when the body has an unexpected shape.
    async fn complete(
        &self,
        conversation: &[Message],
        model: ChatModel,
        api_key: &str,
    ) -> Result<String, DomainError>;
}
