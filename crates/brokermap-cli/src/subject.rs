//! Client for the deal directory's person endpoint.

use std::time::Duration;

use brokermap_core::{PersonDetail, PersonEnvelope};
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubjectError {
    #[error("person \"{slug}\" not found")]
    NotFound { slug: String },

    #[error("person slug is empty")]
    EmptySlug,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

pub struct SubjectClient {
    client: Client,
    base_url: Url,
}

impl SubjectClient {
    /// # Errors
    ///
    /// Returns [`SubjectError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`SubjectError::InvalidBaseUrl`] if `base_url` does not parse
    /// as an absolute URL.
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self, SubjectError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| SubjectError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SubjectError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Fetches `GET {base}/api/people/{slug}` and unwraps the `data` envelope.
    ///
    /// # Errors
    ///
    /// - [`SubjectError::EmptySlug`] for a blank slug.
    /// - [`SubjectError::NotFound`] on HTTP 404.
    /// - [`SubjectError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`SubjectError::Http`] on network failure.
    /// - [`SubjectError::Deserialize`] if the body is not a person envelope.
    pub async fn fetch_person(&self, slug: &str) -> Result<PersonDetail, SubjectError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(SubjectError::EmptySlug);
        }
        let url = self.person_url(slug)?;
        tracing::debug!(slug, %url, "fetching person");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(SubjectError::NotFound {
                slug: slug.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(SubjectError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: PersonEnvelope =
            serde_json::from_str(&body).map_err(|e| SubjectError::Deserialize {
                context: format!("person \"{slug}\""),
                source: e,
            })?;

        tracing::info!(slug, deals = envelope.data.deals.len(), "person loaded");
        Ok(envelope.data)
    }

    /// Appends `api/people/{slug}` as path segments so the slug is escaped.
    pub(crate) fn person_url(&self, slug: &str) -> Result<Url, SubjectError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SubjectError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(["api", "people", slug]);
        Ok(url)
    }
}
