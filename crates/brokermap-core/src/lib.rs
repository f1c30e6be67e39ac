pub mod addresses;
pub mod app_config;
pub mod config;
pub mod deals;
pub mod geo;

use thiserror::Error;

pub use addresses::{extract_addresses, AddressEntry, RECENT_DEALS_CAP};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use deals::{Deal, PersonDetail, PersonEnvelope};
pub use geo::{Coordinates, FailureKind, GeocodeFailure, GeocodeOutcome, GeocodeResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
