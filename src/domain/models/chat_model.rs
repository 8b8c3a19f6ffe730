use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::DomainError;

/// Hosted models offered in the model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChatModel {
    #[default]
    #[serde(rename = "llama3-8b-8192")]
    Llama3_8b8192,
    #[serde(rename = "mixtral-8x7b")]
    Mixtral8x7b,
    #[serde(rename = "gemma-7b")]
    Gemma7b,
}

impl ChatModel {
    /// Selector order; the first entry is the default.
    pub const ALL: [ChatModel; 3] = [
        ChatModel::Llama3_8b8192,
        ChatModel::Mixtral8x7b,
        ChatModel::Gemma7b,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatModel::Llama3_8b8192 => "llama3-8b-8192",
            ChatModel::Mixtral8x7b => "mixtral-8x7b",
            ChatModel::Gemma7b => "gemma-7b",
        }
    }

    /// Resolve a configured model name, falling back to the default for
    /// names outside the supported set.
    pub fn from_name_or_default(name: &str) -> Self {
        match name.parse() {
            Ok(model) => model,
            Err(_) => {
                warn!(
                    "Unsupported model '{}', defaulting to {}",
                    name,
                    ChatModel::default()
                );
                ChatModel::default()
            }
        }
    }
}

impl FromStr for ChatModel {
    type Err = DomainError;

    /// Only the exact model ids are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChatModel::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let supported: Vec<_> = ChatModel::ALL.iter().map(|m| m.as_str()).collect();
                DomainError::invalid_input(format!(
                    "unknown model '{}' (supported: {})",
                    s,
                    supported.join(", ")
                ))
            })
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
