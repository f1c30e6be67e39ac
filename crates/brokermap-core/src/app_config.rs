use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Base URL of the deal directory API serving `/api/people/{slug}`.
    pub api_base_url: String,
    /// Base URL of the Nominatim-compatible geocoding service.
    pub geocoder_url: String,
    /// Sent on every outbound request; Nominatim's usage policy requires one.
    pub user_agent: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Spacing between consecutive geocoding submissions.
    pub geocode_delay_ms: u64,
    /// Pause between the last geocoding attempt and fitting the viewport.
    pub fit_settle_ms: u64,
    /// How many of the subject's most recent deals are scanned for addresses.
    pub recent_deals_cap: usize,
}

impl AppConfig {
    #[must_use]
    pub fn geocode_delay(&self) -> Duration {
        Duration::from_millis(self.geocode_delay_ms)
    }

    #[must_use]
    pub fn fit_settle(&self) -> Duration {
        Duration::from_millis(self.fit_settle_ms)
    }
}
