mod commands;

use clap::{Parser, Subcommand};
use mapassist_pipeline::Services;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mapassist-cli")]
#[command(about = "Search places near a position from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full search pipeline and print the ranked places
    Search {
        /// Free-text request, e.g. "quiet cafe with wifi"
        query: String,
        /// Latitude of the search origin
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the search origin
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in meters (defaults to `MAPASSIST_SEARCH_RADIUS_M`)
        #[arg(long)]
        radius: Option<u32>,
    },
    /// Show how a query is interpreted into a category and keywords
    Intent { query: String },
    /// Fetch one place with a generated description
    Details {
        place_id: String,
        /// Comma-separated wishes the description should address
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = mapassist_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let services = Services::from_config(&config)?;

    match cli.command {
        Commands::Search {
            query,
            lat,
            lon,
            radius,
        } => commands::run_search(&services, &query, lat, lon, radius).await,
        Commands::Intent { query } => commands::run_intent(&services, &query).await,
        Commands::Details { place_id, keywords } => {
            commands::run_details(&services, &place_id, &keywords).await
        }
    }
}

#[cfg(test)]
mod tests;
