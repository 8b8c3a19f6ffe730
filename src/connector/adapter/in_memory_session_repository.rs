use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{SessionHandle, SessionRepository};
use crate::domain::{ChatModel, ChatSession, DomainError};

pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

impl Entry {
    /// Idle for at least `ttl` and not held by any in-flight request.
    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() >= ttl && Arc::strong_count(&self.handle) == 1
    }
}

/// Process-local session store. Sessions are lost on restart, and a session
/// nobody touched for the idle TTL is dropped.
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn evict_expired(store: &mut HashMap<String, Entry>, ttl: Duration) -> usize {
        let before = store.len();
        store.retain(|_, entry| !entry.is_expired(ttl));
        before - store.len()
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, title: &str, model: ChatModel) -> Result<SessionHandle, DomainError> {
        let session = ChatSession::new(title, model);
        let id = session.id().to_string();
        let handle = Arc::new(Mutex::new(session));

        let mut store = self.sessions.lock().await;
        let evicted = Self::evict_expired(&mut store, self.ttl);
        if evicted > 0 {
            debug!("Evicted {} idle sessions", evicted);
        }
        store.insert(
            id.clone(),
            Entry {
                handle: Arc::clone(&handle),
                last_seen: Instant::now(),
            },
        );
        debug!("Stored session {} ({} live)", id, store.len());
        Ok(handle)
    }

    async fn find(&self, id: &str) -> Result<Option<SessionHandle>, DomainError> {
        let mut store = self.sessions.lock().await;
        if store.get(id).is_some_and(|entry| entry.is_expired(self.ttl)) {
            store.remove(id);
            debug!("Session {} expired", id);
            return Ok(None);
        }
        Ok(store.get_mut(id).map(|entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.handle)
        }))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut store = self.sessions.lock().await;
        store
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("Session not found: {}", id)))
    }

    async fn evict_idle(&self) -> Result<usize, DomainError> {
        let mut store = self.sessions.lock().await;
        Ok(Self::evict_expired(&mut store, self.ttl))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.sessions.lock().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[tokio::test]
    async fn sessions_do_not_share_state() {
        let repo = InMemorySessionRepository::new();
        let a = repo.create("A", ChatModel::default()).await.unwrap();
        let b = repo.create("B", ChatModel::Gemma7b).await.unwrap();

        a.lock()
            .await
            .conversation_mut()
            .append(Role::User, "only in a");

        assert_eq!(a.lock().await.conversation().len(), 2);
        assert_eq!(b.lock().await.conversation().len(), 1);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn find_and_delete() {
        let repo = InMemorySessionRepository::new();
        let session = repo.create("A", ChatModel::default()).await.unwrap();
        let id = session.lock().await.id().to_string();

        assert!(repo.find(&id).await.unwrap().is_some());
        repo.delete(&id).await.unwrap();
        assert!(repo.find(&id).await.unwrap().is_none());

        let err = repo.delete(&id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let repo = InMemorySessionRepository::with_ttl(Duration::from_millis(50));
        let id = {
            let session = repo.create("A", ChatModel::default()).await.unwrap();
            let id = session.lock().await.id().to_string();
            id
        };
        for _ in 0..3 {
            repo.create("B", ChatModel::default()).await.unwrap();
        }
        assert_eq!(repo.count().await.unwrap(), 4);

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(repo.find(&id).await.unwrap().is_none());
        assert_eq!(repo.evict_idle().await.unwrap(), 3);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_drops_expired_sessions() {
        let repo = InMemorySessionRepository::with_ttl(Duration::from_millis(20));
        for _ in 0..5 {
            repo.create("A", ChatModel::default()).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(40)).await;

        repo.create("B", ChatModel::default()).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sessions_in_use_are_kept() {
        let repo = InMemorySessionRepository::with_ttl(Duration::from_millis(20));
        let held = repo.create("A", ChatModel::default()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(repo.evict_idle().await.unwrap(), 0);
        let id = held.lock().await.id().to_string();
        drop(held);

        // Released and idle past the TTL.
        assert!(repo.find(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookups_refresh_the_idle_clock() {
        let repo = InMemorySessionRepository::with_ttl(Duration::from_millis(60));
        let id = {
            let session = repo.create("A", ChatModel::default()).await.unwrap();
            let id = session.lock().await.id().to_string();
            id
        };

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(30)).await;
            assert!(repo.find(&id).await.unwrap().is_some());
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
