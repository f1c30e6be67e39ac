//! Subject records served by the deal directory API.
//!
//! ## Observed shape from `GET /api/people/{slug}`
//!
//! The response is wrapped as `{ "data": { ... } }`. The person's `id` comes
//! back as an integer from the graph store but has historically been typed as
//! a string by clients, so both are accepted and normalised to a `String`.
//! Deal ids are integers and may be keyed `_id` in raw exports.
//!
//! `property_address` is absent for deals whose property was never matched to a
//! street address. It can also be an empty string; both mean "nothing to plot".

use serde::{Deserialize, Deserializer, Serialize};

/// Envelope returned by the person detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonEnvelope {
    pub data: PersonDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDetail {
    #[serde(alias = "_id", deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Most recent first, as ordered by the API.
    #[serde(default)]
    pub deals: Vec<Deal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    #[serde(alias = "_id")]
    pub id: i64,
    pub property: String,
    #[serde(default)]
    pub property_address: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "type")]
    pub deal_type: Option<String>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
