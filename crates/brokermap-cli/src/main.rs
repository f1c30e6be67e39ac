use std::path::{Path, PathBuf};

use anyhow::Context;
use brokermap_cli::{format_summary, plot_deals, read_deals_file, write_geojson, SubjectClient};
use brokermap_core::{AppConfig, Deal};
use brokermap_geocoder::{Geocoder, NominatimClient};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "brokermap")]
#[command(about = "Plot a broker's recent deal locations on a map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a person from the deal directory and map their recent deals
    Person {
        slug: String,
        /// Write the GeoJSON map here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Map deals read from a JSON file
    Plot {
        #[arg(long)]
        deals: PathBuf,
        /// Subject label used in logs and the summary
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Geocode a single address and print the outcome
    Geocode { address: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = brokermap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, api = %config.api_base_url, geocoder = %config.geocoder_url, "configuration loaded");

    match cli.command {
        Commands::Person { slug, out } => {
            let client = SubjectClient::new(
                &config.api_base_url,
                &config.user_agent,
                config.request_timeout_secs,
            )?;
            let person = client
                .fetch_person(&slug)
                .await
                .with_context(|| format!("failed to load person \"{slug}\""))?;
            run_plot(&config, &slug, &person.deals, out.as_deref()).await
        }
        Commands::Plot {
            deals,
            subject,
            out,
        } => {
            let loaded = read_deals_file(&deals)?;
            let subject = subject
                .or(loaded.subject)
                .unwrap_or_else(|| deals.display().to_string());
            run_plot(&config, &subject, &loaded.deals, out.as_deref()).await
        }
        Commands::Geocode { address } => {
            let client = NominatimClient::with_base_url(
                &config.user_agent,
                config.request_timeout_secs,
                &config.geocoder_url,
            )?;
            let outcome = client.geocode(&address).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
    }
}

async fn run_plot(
    config: &AppConfig,
    subject: &str,
    deals: &[Deal],
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let report = plot_deals(config, subject, deals).await?;
    let Some(summary) = report.summary else {
        eprintln!("{subject}: no recent deal addresses to plot");
        return Ok(());
    };
    eprintln!("{}", format_summary(&summary));
    if let Some(geojson) = report.geojson {
        write_geojson(&geojson, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
