use thiserror::Error;

use super::models::ErrorDetail;

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The inference endpoint answered with a non-200 status.
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The request never produced an HTTP response (timeout, DNS, refused connection).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A 200 response whose body did not match the expected schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True for failures that originate from the inference endpoint or the
    /// network path to it.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::Transport(_) | Self::MalformedResponse(_)
        )
    }

    /// HTTP status reported by the endpoint, if the failure carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        match self {
            Self::Api { status, body } => ErrorDetail::with_status(*status, body.clone()),
            Self::Transport(msg) => ErrorDetail::without_status(format!("transport failure: {msg}")),
            Self::MalformedResponse(msg) => {
                ErrorDetail::without_status(format!("unexpected response: {msg}"))
            }
            other => ErrorDetail::without_status(other.to_string()),
        }
    }
}
