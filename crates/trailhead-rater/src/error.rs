use thiserror::Error;

/// Errors returned by the difficulty-rating client.
#[derive(Debug, Error)]
pub enum RaterError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx status.
    #[error("rating API returned status {status}: {message}")]
    ApiStatus { status: u16, message: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response carried no text content to read a rating from.
    #[error("rating response contained no text content")]
    EmptyResponse,

    /// The supplied base URL could not be parsed.
    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
