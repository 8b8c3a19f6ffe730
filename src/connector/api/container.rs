use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::application::{
    ChatClient, ClearConversationUseCase, OpenSessionUseCase, SendMessageUseCase,
    SessionRepository,
};
use crate::connector::{
    GroqClient, InMemorySessionRepository, MockChatClient, DEFAULT_BASE_URL,
    DEFAULT_SESSION_TTL_SECS, DEFAULT_TIMEOUT_SECS,
};
use crate::domain::{ChatModel, DomainError};

pub const DEFAULT_APP_NAME: &str = "Groq AI Chatbot";
/// Key baked into the hardcoded configuration; the endpoint rejects it.
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// Runtime configuration shared by every front-end.
///
/// Two sources exist: [`ContainerConfig::default`] carries hardcoded values
/// and never complains about the key, [`ContainerConfig::from_env`] reads the
/// process environment and flags a missing `GROQ_API_KEY`.
#[derive(Clone)]
pub struct ContainerConfig {
    /// Page title, editable per session in the UI.
    pub app_name: String,
    /// Model preselected in the selector for new sessions.
    pub default_model: ChatModel,
    pub api_key: Option<String>,
    /// Surface a warning banner when `api_key` is absent.
    pub require_api_key: bool,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Idle time after which a session is dropped.
    pub session_ttl_secs: u64,
    /// Answer with the offline echo client instead of calling the API.
    pub mock_llm: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            default_model: ChatModel::default(),
            api_key: Some(PLACEHOLDER_API_KEY.to_string()),
            require_api_key: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            mock_llm: false,
        }
    }
}

impl ContainerConfig {
    /// Construct from environment variables:
    ///
    /// | Variable            | Default                        |
    /// |---------------------|--------------------------------|
    /// | `APP_NAME`          | `Groq AI Chatbot`              |
    /// | `MODEL_NAME`        | `llama3-8b-8192`               |
    /// | `GROQ_API_KEY`      | none (warning banner)          |
    /// | `GROQ_BASE_URL`     | `https://api.groq.com/openai`  |
    /// | `GROQ_TIMEOUT_SECS` | `60`                           |
    /// | `SESSION_TTL_SECS`  | `3600`                         |
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let positive_secs = |key: &str, default: u64| match non_empty(key) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!("Ignoring invalid {} '{}', using {}s", key, raw, default);
                    default
                }
            },
            None => default,
        };

        Self {
            app_name: non_empty("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            default_model: non_empty("MODEL_NAME")
                .map(|name| ChatModel::from_name_or_default(name.trim()))
                .unwrap_or_default(),
            api_key: non_empty("GROQ_API_KEY"),
            require_api_key: true,
            base_url: non_empty("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: positive_secs("GROQ_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            session_ttl_secs: positive_secs("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS),
            mock_llm: false,
        }
    }

    /// Banner text for a missing credential, when one is required.
    pub fn credential_warning(&self) -> Option<String> {
        if self.require_api_key && self.api_key.is_none() && !self.mock_llm {
            Some(
                "GROQ_API_KEY is not set. Requests will be rejected until an API key is configured."
                    .to_string(),
            )
        } else {
            None
        }
    }

    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("app_name", &self.app_name)
            .field("default_model", &self.default_model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("require_api_key", &self.require_api_key)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("mock_llm", &self.mock_llm)
            .finish()
    }
}

/// Wires adapters into use cases. One container serves all sessions.
pub struct Container {
    chat_client: Arc<dyn ChatClient>,
    session_repo: Arc<dyn SessionRepository>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self, DomainError> {
        let chat_client: Arc<dyn ChatClient> = if config.mock_llm {
            debug!("Using mock chat client");
            Arc::new(MockChatClient::new())
        } else {
            let client = GroqClient::new(&config.base_url, config.timeout())?;
            debug!("Using Groq chat client at {}", client.url());
            Arc::new(client)
        };
        Ok(Self::with_chat_client(config, chat_client))
    }

    pub fn with_chat_client(config: ContainerConfig, chat_client: Arc<dyn ChatClient>) -> Self {
        let session_repo = Arc::new(InMemorySessionRepository::with_ttl(config.session_ttl()));
        Self {
            chat_client,
            session_repo,
            config,
        }
    }

    pub fn send_message_use_case(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(self.chat_client.clone(), self.config.api_key())
    }

    pub fn clear_conversation_use_case(&self) -> ClearConversationUseCase {
        ClearConversationUseCase::new()
    }

    pub fn open_session_use_case(&self) -> OpenSessionUseCase {
        OpenSessionUseCase::new(
            self.session_repo.clone(),
            self.config.app_name.clone(),
            self.config.default_model,
        )
    }

    pub fn session_repository(&self) -> Arc<dyn SessionRepository> {
        self.session_repo.clone()
    }

    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    pub fn default_model(&self) -> ChatModel {
        self.config.default_model
    }

    pub fn credential_warning(&self) -> Option<String> {
        self.config.credential_warning()
    }

    pub fn session_ttl(&self) -> Duration {
        self.config.session_ttl()
    }
}
