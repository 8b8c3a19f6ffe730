use std::fmt;

use serde::Serialize;

/// What a front-end needs to show about a failed completion.
///
/// `status_code` is set only when the endpoint answered with an HTTP status;
/// `message` then holds the raw response body. Transport and response-shape
/// failures carry a description and no status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    status_code: Option<u16>,
    message: String,
}

impl ErrorDetail {
    pub fn with_status(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            message: body.into(),
        }
    }

    pub fn without_status(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text recorded as the assistant turn when a completion fails.
    pub fn transcript_text(&self) -> String {
        match self.status_code {
            Some(code) => format!("Error: {}, {}", code, self.message),
            None => format!("Error: {}", self.message),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.transcript_text())
    }
}
