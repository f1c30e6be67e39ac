use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "BROKERMAP_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "http://localhost:8000");
    assert_eq!(cfg.geocoder_url, "https://nominatim.openstreetmap.org");
    assert_eq!(cfg.user_agent, "BrokerIntellijApp/1.0");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.geocode_delay_ms, 2000);
    assert_eq!(cfg.fit_settle_ms, 1000);
    assert_eq!(cfg.recent_deals_cap, 10);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("BROKERMAP_ENV", "production");
    map.insert("BROKERMAP_API_BASE_URL", "https://api.example.com");
    map.insert("BROKERMAP_GEOCODER_URL", "http://127.0.0.1:8080");
    map.insert("BROKERMAP_USER_AGENT", "brokermap-test/0.1");
    map.insert("BROKERMAP_GEOCODE_DELAY_MS", "1000");
    map.insert("BROKERMAP_FIT_SETTLE_MS", "0");
    map.insert("BROKERMAP_RECENT_DEALS_CAP", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.api_base_url, "https://api.example.com");
    assert_eq!(cfg.geocoder_url, "http://127.0.0.1:8080");
    assert_eq!(cfg.user_agent, "brokermap-test/0.1");
    assert_eq!(cfg.geocode_delay(), std::time::Duration::from_secs(1));
    assert_eq!(cfg.fit_settle(), std::time::Duration::ZERO);
    assert_eq!(cfg.recent_deals_cap, 25);
}

#[test]
fn build_app_config_fails_on_invalid_delay() {
    let mut map = HashMap::new();
    map.insert("BROKERMAP_GEOCODE_DELAY_MS", "two seconds");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BROKERMAP_GEOCODE_DELAY_MS"),
        "expected InvalidEnvVar(BROKERMAP_GEOCODE_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_on_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("BROKERMAP_REQUEST_TIMEOUT_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BROKERMAP_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(BROKERMAP_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_deal_cap() {
    let mut map = HashMap::new();
    map.insert("BROKERMAP_RECENT_DEALS_CAP", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BROKERMAP_RECENT_DEALS_CAP"),
        "expected InvalidEnvVar(BROKERMAP_RECENT_DEALS_CAP), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_blank_user_agent() {
    let mut map = HashMap::new();
    map.insert("BROKERMAP_USER_AGENT", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BROKERMAP_USER_AGENT"),
        "expected InvalidEnvVar(BROKERMAP_USER_AGENT), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_on_invalid_env() {
    let mut map = HashMap::new();
    map.insert("BROKERMAP_ENV", "producton");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BROKERMAP_ENV"),
        "expected InvalidEnvVar(BROKERMAP_ENV), got: {result:?}"
    );
}
