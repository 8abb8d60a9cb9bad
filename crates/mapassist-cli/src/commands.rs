//! Subcommand handlers. Each prints one pretty JSON document on stdout;
//! logs go to stderr.

use anyhow::{bail, Context};
use mapassist_core::{Coordinates, SearchQuery};
use mapassist_pipeline::Services;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn require_query(query: &str) -> anyhow::Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        bail!("query must not be blank");
    }
    Ok(query)
}

pub(crate) fn parse_origin(lat: f64, lon: f64) -> anyhow::Result<Coordinates> {
    let origin = Coordinates::new(lat, lon);
    if !origin.is_valid() {
        bail!("invalid coordinates {lat},{lon}: latitude must be within -90..=90 and longitude within -180..=180");
    }
    Ok(origin)
}

pub(crate) async fn run_search(
    services: &Services,
    query: &str,
    lat: f64,
    lon: f64,
    radius: Option<u32>,
) -> anyhow::Result<()> {
    let text = require_query(query)?.to_string();
    let origin = parse_origin(lat, lon)?;
    let pipeline = &services.pipeline;
    let radius_m = match radius {
        Some(0) => bail!("--radius must be positive"),
        Some(radius) => radius,
        None => pipeline.source().default_radius_m(),
    };

    let results = pipeline
        .search_within(&SearchQuery { text, origin }, radius_m)
        .await;
    print_json(&results)
}

pub(crate) async fn run_intent(services: &Services, query: &str) -> anyhow::Result<()> {
    let query = require_query(query)?;
    let intent = services.pipeline.interpreter().interpret(query).await;
    print_json(&intent)
}

pub(crate) async fn run_details(
    services: &Services,
    place_id: &str,
    keywords: &[String],
) -> anyhow::Result<()> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    tracing::debug!(place_id, keywords = ?keywords, "fetching place details");

    let Some(details) = services.details.describe(place_id, &keywords).await else {
        bail!("place {place_id} not found");
    };
    print_json(&details)
}
