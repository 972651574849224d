use thiserror::Error;

/// Errors returned by the chat-completion client.
///
/// These stay inside the trusted boundary: the orchestrator logs them
/// and hands the caller a generic failure, so no provider error text
/// or credential material ever reaches the form.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A well-formed response with no completions to read.
    #[error("completion response contained no choices")]
    EmptyChoices,
}
