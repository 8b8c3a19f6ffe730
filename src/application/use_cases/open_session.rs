use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{SessionHandle, SessionRepository};
use crate::domain::{ChatModel, DomainError};

/// Use case resolving the caller's session, creating one when the id is
/// missing or no longer known.
pub struct OpenSessionUseCase {
    session_repo: Arc<dyn SessionRepository>,
    default_title: String,
    default_model: ChatModel,
}

impl OpenSessionUseCase {
    pub fn new(
        session_repo: Arc<dyn SessionRepository>,
        default_title: impl Into<String>,
        default_model: ChatModel,
    ) -> Self {
        Self {
            session_repo,
            default_title: default_title.into(),
            default_model,
        }
    }

    /// Returns the session and whether it was created by this call.
    pub async fn execute(&self, id: Option<&str>) -> Result<(SessionHandle, bool), DomainError> {
        if let Some(id) = id {
            if let Some(session) = self.session_repo.find(id).await? {
                debug!("Resumed session {}", id);
                return Ok((session, false));
            }
            debug!("Session {} not found, starting a new one", id);
        }

        let session = self
            .session_repo
            .create(&self.default_title, self.default_model)
            .await?;
        info!("Started session {}", session.lock().await.id());
        Ok((session, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::InMemorySessionRepository;

    fn use_case(repo: Arc<InMemorySessionRepository>) -> OpenSessionUseCase {
        OpenSessionUseCase::new(repo, "Groq AI Chatbot", ChatModel::Mixtral8x7b)
    }

    #[tokio::test]
    async fn creates_session_with_configured_defaults() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let (session, created) = use_case(repo.clone()).execute(None).await.unwrap();

        assert!(created);
        let session = session.lock().await;
        assert_eq!(session.title(), "Groq AI Chatbot");
        assert_eq!(session.model(), ChatModel::Mixtral8x7b);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn resumes_known_session() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let use_case = use_case(repo.clone());
        let (first, _) = use_case.execute(None).await.unwrap();
        let id = first.lock().await.id().to_string();

        let (again, created) = use_case.execute(Some(&id)).await.unwrap();

        assert!(!created);
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_id_starts_fresh_session() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let (session, created) = use_case(repo).execute(Some("stale-id")).await.unwrap();

        assert!(created);
        assert_ne!(session.lock().await.id(), "stale-id");
    }
}
