use brokermap_core::FailureKind;
use thiserror::Error;

/// Errors returned by the Nominatim client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by geocoder (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid geocoder base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl GeocodeError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            GeocodeError::Http(_) | GeocodeError::InvalidBaseUrl { .. } => FailureKind::Transport,
            GeocodeError::RateLimited { .. } => FailureKind::RateLimited,
            GeocodeError::UnexpectedStatus { .. } => FailureKind::Status,
            GeocodeError::Deserialize { .. } => FailureKind::Decode,
        }
    }
}
