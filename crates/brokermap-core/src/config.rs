use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Reads configuration from the process environment after loading `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that does not parse
/// or fails validation.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] without touching `.env` files.
///
/// # Errors
///
/// See [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Every `BROKERMAP_*` setting has a default, so an empty environment
/// yields a development configuration aimed at the public Nominatim host.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let setting = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_owned());

    let env = parse_environment(&setting("BROKERMAP_ENV", "development"))?;
    let user_agent = setting("BROKERMAP_USER_AGENT", "BrokerIntellijApp/1.0");
    if user_agent.trim().is_empty() {
        return Err(invalid("BROKERMAP_USER_AGENT", "must not be blank"));
    }

    let recent_deals_cap: usize = parse_number(
        "BROKERMAP_RECENT_DEALS_CAP",
        &setting("BROKERMAP_RECENT_DEALS_CAP", "10"),
    )?;
    if recent_deals_cap == 0 {
        return Err(invalid("BROKERMAP_RECENT_DEALS_CAP", "must be at least 1"));
    }

    Ok(AppConfig {
        env,
        api_base_url: setting("BROKERMAP_API_BASE_URL", "http://localhost:8000"),
        geocoder_url: setting("BROKERMAP_GEOCODER_URL", "https://nominatim.openstreetmap.org"),
        user_agent,
        log_level: setting("BROKERMAP_LOG_LEVEL", "info"),
        request_timeout_secs: parse_number(
            "BROKERMAP_REQUEST_TIMEOUT_SECS",
            &setting("BROKERMAP_REQUEST_TIMEOUT_SECS", "30"),
        )?,
        geocode_delay_ms: parse_number(
            "BROKERMAP_GEOCODE_DELAY_MS",
            &setting("BROKERMAP_GEOCODE_DELAY_MS", "2000"),
        )?,
        fit_settle_ms: parse_number(
            "BROKERMAP_FIT_SETTLE_MS",
            &setting("BROKERMAP_FIT_SETTLE_MS", "1000"),
        )?,
        recent_deals_cap,
    })
}

fn parse_number<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| invalid(var, e))
}

fn invalid(var: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_owned(),
        reason: reason.to_string(),
    }
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(invalid(
            "BROKERMAP_ENV",
            format!("expected development, test, or production; got \"{other}\""),
        )),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
