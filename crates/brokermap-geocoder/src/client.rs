//! HTTP client for the Nominatim `search` endpoint.
//!
//! One request per call, no retries. Rate limiting is handled upstream by
//! spacing submissions; a 429 here is surfaced as
//! [`GeocodeError::RateLimited`] and counted as a failed attempt.

use std::time::Duration;

use brokermap_core::GeocodeOutcome;
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::outcome::classify;
use crate::types::NominatimPlace;
use crate::Geocoder;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Client for a Nominatim-compatible geocoding service.
///
/// Use [`NominatimClient::new`] for the public instance or
/// [`NominatimClient::with_base_url`] to point at a self-hosted service or a
/// mock server in tests.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
}

impl NominatimClient {
    /// Creates a client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(user_agent, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // A trailing slash keeps `join("search")` under any path prefix the
        // service is mounted at.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Looks up `address` and returns every candidate the service offers.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::RateLimited`] on HTTP 429.
    /// - [`GeocodeError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`GeocodeError::Http`] on network or TLS failure.
    /// - [`GeocodeError::Deserialize`] if the body is not a candidate array.
    pub async fn search(&self, address: &str) -> Result<Vec<NominatimPlace>, GeocodeError> {
        let url = self.search_url(address)?;
        tracing::debug!(address, "geocoding request");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(GeocodeError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Vec<NominatimPlace>>(&body).map_err(|e| {
            GeocodeError::Deserialize {
                context: format!("search results for \"{address}\""),
                source: e,
            }
        })
    }

    /// Builds `{base}/search?format=json&q={address}` with the address
    /// percent-encoded.
    fn search_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", address);
        Ok(url)
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> GeocodeOutcome {
        let outcome = classify(self.search(address).await);
        match &outcome {
            GeocodeOutcome::Resolved { coordinates } => {
                tracing::debug!(address, %coordinates, "address resolved");
            }
            GeocodeOutcome::Empty => {
                tracing::warn!(address, "geocoder returned no usable match");
            }
            GeocodeOutcome::Failed { failure } => {
                tracing::warn!(address, kind = ?failure.kind, error = %failure, "geocoding failed");
            }
        }
        outcome
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
