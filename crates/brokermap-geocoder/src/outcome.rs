//! Folds a raw lookup result into a [`GeocodeOutcome`].

use brokermap_core::GeocodeOutcome;

use crate::error::GeocodeError;
use crate::types::NominatimPlace;

/// Classifies a Nominatim response.
///
/// The first candidate with parseable, in-range coordinates wins. A response
/// with no such candidate is [`GeocodeOutcome::Empty`], the same as a
/// zero-match response. Errors become [`GeocodeOutcome::Failed`] carrying the
/// error's [`brokermap_core::FailureKind`].
#[must_use]
pub fn classify(result: Result<Vec<NominatimPlace>, GeocodeError>) -> GeocodeOutcome {
    match result {
        Ok(places) => places
            .iter()
            .find_map(NominatimPlace::coordinates)
            .map_or(GeocodeOutcome::Empty, |coordinates| {
                GeocodeOutcome::Resolved { coordinates }
            }),
        Err(e) => GeocodeOutcome::failed(e.kind(), e.to_string()),
    }
}
