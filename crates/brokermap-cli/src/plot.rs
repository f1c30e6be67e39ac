//! Runs the annotation workflow for one subject and writes the map.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use brokermap_annotate::{GeoJsonLibrary, LoadOutcome, MapController, WorkflowOptions, WorkflowSummary};
use brokermap_core::{AppConfig, Deal, PersonDetail, PersonEnvelope};
use brokermap_geocoder::NominatimClient;
use serde::Deserialize;
use serde_json::Value;

/// Accepted shapes for `plot --deals`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DealsFile {
    Deals(Vec<Deal>),
    Envelope(PersonEnvelope),
    Person(PersonDetail),
}

/// Deals loaded from disk, with the subject they belong to when known.
#[derive(Debug)]
pub struct LoadedDeals {
    pub subject: Option<String>,
    pub deals: Vec<Deal>,
}

/// Parses a deal array, a `{ "data": PersonDetail }` envelope, or a bare
/// person record.
///
/// # Errors
///
/// Returns an error when the document matches none of the accepted shapes.
pub fn parse_deals(json: &str) -> anyhow::Result<LoadedDeals> {
    let parsed: DealsFile = serde_json::from_str(json)
        .context("expected a deal array or a person record with a \"deals\" field")?;
    Ok(match parsed {
        DealsFile::Deals(deals) => LoadedDeals {
            subject: None,
            deals,
        },
        DealsFile::Envelope(PersonEnvelope { data: person }) | DealsFile::Person(person) => {
            LoadedDeals {
                subject: Some(person.name),
                deals: person.deals,
            }
        }
    })
}

/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_deals_file(path: &Path) -> anyhow::Result<LoadedDeals> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read deals file {}", path.display()))?;
    parse_deals(&raw).with_context(|| format!("failed to parse deals file {}", path.display()))
}

/// The finished map and how the workflow went.
#[derive(Debug)]
pub struct PlotReport {
    pub summary: Option<WorkflowSummary>,
    pub geojson: Option<Value>,
}

/// Geocodes the subject's deal addresses and renders the resulting map.
///
/// Returns with an empty report when there is nothing to plot or the run is
/// interrupted.
///
/// # Errors
///
/// Returns an error if the geocoding client or the map cannot be created.
pub async fn plot_deals(
    config: &AppConfig,
    subject: &str,
    deals: &[Deal],
) -> anyhow::Result<PlotReport> {
    let geocoder = NominatimClient::with_base_url(
        &config.user_agent,
        config.request_timeout_secs,
        &config.geocoder_url,
    )
    .context("failed to build geocoding client")?;

    let mut controller = MapController::new(
        GeoJsonLibrary::new(),
        Arc::new(geocoder),
        WorkflowOptions::from_config(config),
    );

    match controller.load_subject(subject, deals)? {
        LoadOutcome::Started { session, requested } => {
            tracing::info!(%session, subject, requested, "geocoding deal addresses");
        }
        LoadOutcome::NoAddresses => {
            return Ok(PlotReport {
                summary: None,
                geojson: None,
            });
        }
        LoadOutcome::LibraryNotLoaded => anyhow::bail!("map library is not available"),
    }

    let summary = tokio::select! {
        summary = controller.run_to_completion() => summary,
        _ = tokio::signal::ctrl_c() => None,
    };
    if summary.is_none() {
        tracing::warn!(subject, "interrupted before every address was attempted");
        controller.dispose();
        return Ok(PlotReport {
            summary: None,
            geojson: None,
        });
    }

    let geojson = controller
        .current_session()
        .map(|session| session.surface().to_geojson());
    controller.dispose();

    Ok(PlotReport { summary, geojson })
}

/// Writes `geojson` to `out`, or to stdout when no path is given.
///
/// # Errors
///
/// Returns an error if serialisation or the write fails.
pub fn write_geojson(geojson: &Value, out: Option<&Path>) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(geojson)?;
    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write map to {}", path.display()))?;
            tracing::info!(path = %path.display(), "map written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[must_use]
pub fn format_summary(summary: &WorkflowSummary) -> String {
    let line = format!(
        "{}: {} of {} addresses placed ({} no match, {} failed)",
        summary.subject, summary.resolved, summary.total_requested, summary.empty, summary.failed
    );
    match summary.total_requested.checked_sub(summary.attempted) {
        Some(pending) if pending > 0 => format!("{line}, {pending} not attempted"),
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use brokermap_annotate::SessionId;

    use super::*;

    #[test]
    fn parses_bare_deal_array() {
        let loaded = parse_deals(
            r#"[{"id": 1, "property": "One Vanderbilt", "property_address": "1 Vanderbilt Ave", "date": "2024-03-01"}]"#,
        )
        .unwrap();
        assert!(loaded.subject.is_none());
        assert_eq!(loaded.deals.len(), 1);
        assert_eq!(loaded.deals[0].property_address.as_deref(), Some("1 Vanderbilt Ave"));
    }

    #[test]
    fn parses_person_envelope() {
        let loaded = parse_deals(
            r#"{"data": {"id": 12, "name": "Jane Doe", "deals": [{"id": 1, "property": "P", "date": "2024-01-01"}]}}"#,
        )
        .unwrap();
        assert_eq!(loaded.subject.as_deref(), Some("Jane Doe"));
        assert_eq!(loaded.deals.len(), 1);
    }

    #[test]
    fn parses_bare_person() {
        let loaded = parse_deals(r#"{"id": "12", "name": "Jane Doe"}"#).unwrap();
        assert_eq!(loaded.subject.as_deref(), Some("Jane Doe"));
        assert!(loaded.deals.is_empty());
    }

    #[test]
    fn rejects_unrelated_json() {
        assert!(parse_deals(r#"{"items": []}"#).is_err());
    }

    #[test]
    fn summary_mentions_unattempted_addresses() {
        let summary = WorkflowSummary {
            session: SessionId(1),
            subject: "Jane Doe".to_owned(),
            total_requested: 4,
            attempted: 3,
            resolved: 2,
            empty: 1,
            failed: 0,
            viewport: None,
            markers: Vec::new(),
        };
        assert_eq!(
            format_summary(&summary),
            "Jane Doe: 2 of 4 addresses placed (1 no match, 0 failed), 1 not attempted"
        );
    }
}
