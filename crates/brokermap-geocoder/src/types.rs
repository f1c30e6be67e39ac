//! Nominatim `search?format=json` response types.
//!
//! The endpoint returns a bare JSON array of candidate places ordered by
//! relevance; an empty array means no match. `lat` and `lon` are decimal
//! strings (`"40.7484405"`). Some compatible services (Photon adapters,
//! self-hosted forks) emit plain numbers instead, so both are accepted and
//! kept as text until [`NominatimPlace::coordinates`] parses them.

use brokermap_core::Coordinates;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    #[serde(default)]
    pub place_id: Option<i64>,
    #[serde(deserialize_with = "number_or_string")]
    pub lat: String,
    #[serde(deserialize_with = "number_or_string")]
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NominatimPlace {
    /// Parsed position, or `None` if either value is not a usable number.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::parse_pair(&self.lat, &self.lon)
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}
