//! HTTP client for the chat completions endpoint.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;

use crate::config::OpenAiConfig;
use crate::services::evaluation::TipSource;

use super::error::OpenAiError;
use super::types::{ChatMessage, ChatRequest, ChatResponse};

const SYSTEM_PROMPT: &str = "Você é um assistente energético.";
const TIP_QUESTION: &str = "Como posso reduzir meu gasto de energia?";
const MAX_TOKENS: u32 = 150;

/// Chat-completion client for energy-saving tips.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct TipClient {
    inner: Arc<TipClientInner>,
}

struct TipClientInner {
    client: reqwest::Client,
    model: String,
    api_url: Url,
}

impl TipClient {
    /// Create a new tip client.
    ///
    /// # Errors
    ///
    /// Returns `OpenAiError::InvalidApiKey` if the key cannot be used as a
    /// header value, or `OpenAiError::Http` if the HTTP client fails to build.
    pub fn new(config: &OpenAiConfig) -> Result<Self, OpenAiError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
            .map_err(|_| OpenAiError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(TipClientInner {
                client,
                model: config.model.clone(),
                api_url: config.api_url.clone(),
            }),
        })
    }

    /// Ask for one energy-saving tip.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the endpoint answers with a
    /// non-success status, or the body holds no message content.
    #[instrument(skip(self), fields(model = %self.inner.model))]
    pub async fn fetch_tip(&self) -> Result<String, OpenAiError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(TIP_QUESTION),
            ],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .inner
            .client
            .post(self.inner.api_url.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenAiError::Status(status));
        }

        let body = response.text().await?;
        let parsed = ChatResponse::parse(&body)
            .map_err(|e| OpenAiError::Parse(format!("Failed to parse response: {e}")))?;

        parsed
            .and_then(ChatResponse::into_first_content)
            .ok_or(OpenAiError::MissingContent)
    }
}

impl TipSource for TipClient {
    fn energy_tip(&self) -> impl Future<Output = String> + Send {
        async move {
            match self.fetch_tip().await {
                Ok(tip) => tip,
                Err(e) => {
                    tracing::warn!(error = %e, "tip request failed, using fallback message");
                    e.fallback_message().to_string()
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_tip_client_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<TipClient>();
    }

    #[test]
    fn test_tip_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TipClient>();
    }

    #[test]
    fn test_rejects_key_with_newline() {
        let config = OpenAiConfig {
            api_key: SecretString::from("sk-abc\ndef"),
            model: "gpt-4".to_string(),
            api_url: Url::parse("http://127.0.0.1:9/v1/chat/completions").unwrap(),
        };

        assert!(matches!(TipClient::new(&config), Err(OpenAiError::InvalidApiKey)));
    }
}
