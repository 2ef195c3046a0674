use thiserror::Error;

/// Errors returned by the video index and language model clients.
#[derive(Debug, Error)]
pub enum IntelError {
    /// Network or TLS failure, or a non-2xx status from the upstream API.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model answered but the answer held no usable content.
    #[error("unusable model output: {0}")]
    UnusableOutput(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl IntelError {
    /// `true` when the upstream API answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, IntelError::Http(e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND))
    }
}
