//! Error types for the tip client.

use thiserror::Error;

pub const PROCESSING_FALLBACK: &str =
    "Ocorreu um erro ao processar sua solicitação. Por favor, tente novamente.";
pub const UNAVAILABLE_FALLBACK: &str =
    "Não foi possível obter uma dica no momento. Por favor, tente novamente mais tarde.";
pub const UNREADABLE_FALLBACK: &str = "Não foi possível interpretar a resposta da API.";

/// Errors that can occur when asking the chat-completion endpoint for a tip.
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API key cannot be sent as a header value.
    #[error("API key contains characters not allowed in a header")]
    InvalidApiKey,

    /// The endpoint answered with a non-success status.
    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),

    /// Body was not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// Valid JSON, but no `choices[0].message.content`.
    #[error("response has no message content")]
    MissingContent,
}

impl OpenAiError {
    /// User-facing text shown in place of a tip.
    #[must_use]
    pub const fn fallback_message(&self) -> &'static str {
        match self {
            Self::Status(_) => UNAVAILABLE_FALLBACK,
            Self::MissingContent => UNREADABLE_FALLBACK,
            Self::Http(_) | Self::InvalidApiKey | Self::Parse(_) => PROCESSING_FALLBACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_messages() {
        assert_eq!(
            OpenAiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).fallback_message(),
            UNAVAILABLE_FALLBACK
        );
        assert_eq!(
            OpenAiError::Parse("expected value".to_string()).fallback_message(),
            PROCESSING_FALLBACK
        );
        assert_eq!(OpenAiError::MissingContent.fallback_message(), UNREADABLE_FALLBACK);
    }

    #[test]
    fn test_error_display() {
        let err = OpenAiError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.to_string(), "API returned status 429 Too Many Requests");
    }
}
