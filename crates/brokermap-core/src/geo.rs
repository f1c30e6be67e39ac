//! Coordinates and per-address geocoding outcomes.

use serde::{Deserialize, Serialize};

use crate::addresses::AddressEntry;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside WGS84 degree ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Parses a `lat`/`lon` pair of numeric strings as served by Nominatim.
    ///
    /// Returns `None` when either side does not parse or the result is not a
    /// valid position.
    #[must_use]
    pub fn parse_pair(lat: &str, lon: &str) -> Option<Self> {
        let lat = lat.trim().parse::<f64>().ok()?;
        let lon = lon.trim().parse::<f64>().ok()?;
        let coords = Self::new(lat, lon);
        coords.is_valid().then_some(coords)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Coarse category of a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    RateLimited,
    Status,
    Decode,
    Panicked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl GeocodeFailure {
    #[must_use]
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for GeocodeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeOutcome {
    Resolved { coordinates: Coordinates },
    /// The service answered but had no usable match.
    Empty,
    Failed { failure: GeocodeFailure },
}

impl GeocodeOutcome {
    #[must_use]
    pub fn resolved(lat: f64, lon: f64) -> Self {
        Self::Resolved {
            coordinates: Coordinates::new(lat, lon),
        }
    }

    #[must_use]
    pub fn failed(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self::Failed {
            failure: GeocodeFailure::new(kind, reason),
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Resolved { coordinates } => Some(*coordinates),
            Self::Empty | Self::Failed { .. } => None,
        }
    }
}

/// One answered lookup. `ordinal` is the entry's position in the extracted
/// address list and identifies it within a workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub ordinal: usize,
    pub query: AddressEntry,
    pub outcome: GeocodeOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_accepts_numeric_strings() {
        let c = Coordinates::parse_pair("40.7484405", " -73.9856644 ").unwrap();
        assert!((c.lat - 40.748_440_5).abs() < 1e-9);
        assert!((c.lon + 73.985_664_4).abs() < 1e-9);
    }

    #[test]
    fn parse_pair_rejects_garbage_and_nan() {
        assert!(Coordinates::parse_pair("abc", "1.0").is_none());
        assert!(Coordinates::parse_pair("NaN", "1.0").is_none());
        assert!(Coordinates::parse_pair("1.0", "inf").is_none());
    }

    #[test]
    fn parse_pair_rejects_out_of_range() {
        assert!(Coordinates::parse_pair("91.0", "0.0").is_none());
        assert!(Coordinates::parse_pair("0.0", "-180.5").is_none());
        assert!(Coordinates::parse_pair("-90.0", "180.0").is_some());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(GeocodeOutcome::Empty).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "empty" }));
    }
}
