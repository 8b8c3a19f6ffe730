use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{ChatModel, DomainError, Message, Role};

enum Behavior {
    Echo,
    Reply(String),
    Fail(DomainError),
}

/// Offline [`ChatClient`] that never touches the network.
///
/// By default it echoes the latest user turn. It records every call so tests
/// can assert on what would have been sent.
pub struct MockChatClient {
    behavior: Behavior,
    calls: AtomicUsize,
    last_request: Mutex<Option<(Vec<Message>, ChatModel)>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(reply.into()))
    }

    pub fn failing(error: DomainError) -> Self {
        Self::with_behavior(Behavior::Fail(error))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_conversation(&self) -> Option<Vec<Message>> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(messages, _)| messages.clone())
    }

    pub fn last_model(&self) -> Option<ChatModel> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(_, model)| *model)
    }

    fn echo(conversation: &[Message]) -> String {
        let last_user = conversation
            .iter()
            .rev()
            .find(|m| m.role() == Role::User)
            .map(|m| m.content())
            .unwrap_or_default();
        format!("You said: {last_user}")
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(
        &self,
        conversation: &[Message],
        model: ChatModel,
        _api_key: &str,
    ) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) =
            Some((conversation.to_vec(), model));
        debug!("MockChatClient: {} messages for {}", conversation.len(), model);

        match &self.behavior {
            Behavior::Echo => Ok(Self::echo(conversation)),
            Behavior::Reply(reply) => Ok(reply.clone()),
            Behavior::Fail(error) => Err(error.clone()),
        }
    }
}
