use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatModel, ChatSession, DomainError};

/// Shared handle to one session. Holding the lock serializes work within the
/// session; other sessions are unaffected.
pub type SessionHandle = Arc<Mutex<ChatSession>>;

/// Storage for live chat sessions keyed by session id.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, title: &str, model: ChatModel) -> Result<SessionHandle, DomainError>;

    async fn find(&self, id: &str) -> Result<Option<SessionHandle>, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// Drop sessions idle past the store's TTL that no request holds.
    /// Returns how many were removed.
    async fn evict_idle(&self) -> Result<usize, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;
}
