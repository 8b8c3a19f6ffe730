use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{ChatModel, DomainError, Message};

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// The slice of the chat-completions response we read:
/// `choices[0].message.content`.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for the Groq chat completions API (and any other
/// OpenAI-compatible `/v1/chat/completions` endpoint).
///
/// One POST per call, no retries. Anything but `200 OK` becomes
/// [`DomainError::Api`] carrying the status and raw body; failures before a
/// response arrives, including the request timeout, become
/// [`DomainError::Transport`].
pub struct GroqClient {
    client: reqwest::Client,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
    timeout: Duration,
}

impl GroqClient {
    /// Fails only if the HTTP client cannot be built; a client without the
    /// request timeout is never handed out.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn describe_transport_error(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else if e.is_connect() {
            format!("could not connect to {}: {e}", self.url)
        } else {
            format!("request failed: {e}")
        }
    }

    /// Pull `choices[0].message.content` out of a 200 response body.
    fn parse_reply(body: &str) -> Result<String, DomainError> {
        let response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| DomainError::malformed(format!("failed to parse response: {e}")))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::malformed("response contained no choices"))?;

        choice
            .message
            .content
            .ok_or_else(|| DomainError::malformed("first choice has no message content"))
    }
}

#[async_trait]
impl ChatClient for GroqClient {
    async fn complete(
        &self,
        conversation: &[Message],
        model: ChatModel,
        api_key: &str,
    ) -> Result<String, DomainError> {
        if conversation.is_empty() {
            return Err(DomainError::invalid_input(
                "conversation must contain at least the system message",
            ));
        }

        let request = ApiRequest {
            model: model.as_str(),
            messages: conversation
                .iter()
                .map(|m| ApiMessage {
                    role: m.role().as_str(),
                    content: m.content(),
                })
                .collect(),
        };

        debug!(
            "GroqClient: POST {} model={} messages={}",
            self.url,
            model,
            conversation.len()
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::transport(self.describe_transport_error(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::transport(self.describe_transport_error(&e)))?;

        if status != StatusCode::OK {
            warn!("GroqClient: API returned {status}: {body}");
            return Err(DomainError::api(status.as_u16(), body));
        }

        Self::parse_reply(&body)
    }
}
