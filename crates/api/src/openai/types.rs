//! Request and response bodies of the chat completions API.
//!
//! Only the fields the tip request uses are modelled.

use serde::{Deserialize, Serialize};

/// Request body for the chat completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    #[must_use]
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Response body. Every level is optional, down to individual `null`
/// choices, so a well-formed but unexpected payload is reported as missing
/// content rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Option<Vec<Option<Choice>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if any.
    #[must_use]
    pub fn into_first_content(self) -> Option<String> {
        self.choices?.into_iter().next()??.message?.content
    }

    /// Parse a response body. A literal `null` body parses to `None`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not JSON of this shape.
    pub fn parse(body: &str) -> Result<Option<Self>, serde_json::Error> {
        serde_json::from_str(body)
    }
}
