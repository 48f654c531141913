use thiserror::Error;

pub const FETCH_FALLBACK_MESSAGE: &str = "Failed to fetch transactions";

/// Failure of a single transaction fetch.
///
/// Callers treat every variant the same way: the batch is unavailable and the
/// `Display` text is shown to the user as is. A provider-signalled failure
/// displays exactly the provider message.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Provider(String),
    #[error("Invalid timestamp in transaction {hash}: {value}")]
    Timestamp { hash: String, value: String },
    #[error("Address must not be empty")]
    EmptyAddress,
    #[error("No explorer endpoints configured")]
    NoEndpoints,
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildError(String),
}

impl FetchError {
    pub fn provider(message: Option<&str>) -> Self {
        match message {
            Some(msg) if !msg.is_empty() => FetchError::Provider(msg.to_string()),
            _ => FetchError::Provider(FETCH_FALLBACK_MESSAGE.to_string()),
        }
    }
}
