use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::InferenceError;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

const DEFAULT_BASE_URL: &str = "https://api.groq.com";
const CHAT_COMPLETIONS_PATH: &str = "openai/v1/chat/completions";

/// Client for the provider's OpenAI-compatible chat-completion
/// endpoint.
///
/// Holds the server-side credential and sends it as a bearer token.
/// This type must only ever be constructed inside the trusted
/// execution boundary; the form layer never sees the key. Use
/// [`InferenceClient::new`] for production or
/// [`InferenceClient::with_base_url`] to point at a mock server in
/// tests.
pub struct InferenceClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
}

impl InferenceClient {
    /// Creates a new client pointed at the production inference API.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, InferenceError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed, or
    /// [`InferenceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| InferenceError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            model: model.to_owned(),
        })
    }

    /// Sends one user message and returns the first completion's text
    /// verbatim.
    ///
    /// A single best-effort attempt: no retries, no backoff.
    ///
    /// # Errors
    ///
    /// - [`InferenceError::Http`] on network failure or non-2xx status.
    /// - [`InferenceError::Deserialize`] if the body is not the
    ///   expected JSON shape.
    /// - [`InferenceError::EmptyChoices`] if the response carries no
    ///   completions.
    pub async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        let url = self
            .base_url
            .join(CHAT_COMPLETIONS_PATH)
            .unwrap_or_else(|_| self.base_url.clone());

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| InferenceError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(InferenceError::EmptyChoices)?;
        Ok(choice.message.content)
    }
}
