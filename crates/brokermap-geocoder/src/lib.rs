pub mod client;
pub mod error;
pub mod outcome;
pub mod types;

use std::future::Future;

use brokermap_core::GeocodeOutcome;

pub use client::NominatimClient;
pub use error::GeocodeError;
pub use outcome::classify;
pub use types::NominatimPlace;

/// Resolves a free-text address to a single outcome.
///
/// Implementations never return an error: transport and decode failures are
/// folded into [`GeocodeOutcome::Failed`], so every call accounts for exactly
/// one attempt.
pub trait Geocoder: Send + Sync + 'static {
    fn geocode(&self, address: &str) -> impl Future<Output = GeocodeOutcome> + Send;
}
