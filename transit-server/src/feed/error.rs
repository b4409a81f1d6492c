//! Feed client error types.

/// Errors from the open-data feed client.
///
/// Every variant is a transport-level failure; "nothing found" is never an
/// error and comes back as an empty collection instead.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-success status
    #[error("feed error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response envelope could not be parsed. `body` holds the start of
    /// the offending payload for logging.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}
