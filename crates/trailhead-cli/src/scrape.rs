//! Trail scrape command handler: the fleet orchestrator.
//!
//! Walks the park list from the warehouse strictly sequentially, scraping
//! one park at a time with a politeness delay between parks. Failures below
//! this level are absorbed inside the scraper; a park that yields nothing
//! simply contributes zero trails.

use std::path::Path;
use std::time::Duration;

use sqlx::PgPool;
use trailhead_core::AppConfig;
use trailhead_scraper::{scrape_park, ParkSite, Trail};

use crate::fail_run_best_effort;

/// Scrape every eligible park and replace the warehouse's trail table with
/// this run's output, tracked as one collection run. When `output` is set
/// the full trail sequence is also written to a JSON file for inspection.
///
/// # Errors
///
/// Returns an error if no eligible parks exist, the HTTP client or
/// collection run cannot be created, the side file cannot be written, or
/// the warehouse load fails.
pub(crate) async fn run_scrape(
    pool: &PgPool,
    config: &AppConfig,
    park_filter: Option<&str>,
    output: Option<&Path>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let parks = load_parks_for_scrape(pool, park_filter).await?;

    if dry_run {
        println!("dry-run: would scrape {} park(s):", parks.len());
        for park in &parks {
            println!(
                "  {} \u{2014} {}",
                park.park_code,
                park.park_url.as_deref().unwrap_or("(no url)")
            );
        }
        return Ok(());
    }

    let client = trailhead_scraper::build_client(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?;
    let delay = Duration::from_millis(config.scraper_politeness_delay_ms);

    println!("Scraping trails for {} park(s)...", parks.len());

    let run = trailhead_db::create_collection_run(pool, "scrape", "cli").await?;
    if let Err(e) = trailhead_db::start_collection_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, "scrape", format!("{e:#}")).await;
        return Err(e.into());
    }

    let mut all_trails: Vec<Trail> = Vec::new();
    let park_count = parks.len();

    for (idx, park) in parks.iter().enumerate() {
        let Some(park_url) = &park.park_url else {
            tracing::warn!(park = %park.park_code, "skipping park without a site URL");
            continue;
        };

        tracing::info!(
            park = %park.park_code,
            position = idx + 1,
            total = park_count,
            "processing park"
        );

        let site = ParkSite {
            park_code: park.park_code.clone(),
            park_name: park.park_name.clone(),
            park_url: park_url.clone(),
        };
        let trails = scrape_park(&client, &site, delay).await;

        println!("  \u{2713} {:<6} {:>4} trails", park.park_code, trails.len());
        all_trails.extend(trails);

        tokio::time::sleep(delay).await;
    }

    tracing::info!(trails = all_trails.len(), "fleet scrape complete");

    if let Some(path) = output {
        if let Err(e) = write_side_file(path, &all_trails) {
            let message = format!("could not write side file: {e:#}");
            fail_run_best_effort(pool, run.id, "scrape", message).await;
            return Err(e);
        }
        println!("Wrote {} trails to {}", all_trails.len(), path.display());
    }

    if all_trails.is_empty() {
        tracing::warn!("no trails found; keeping the previous run's rows");
    } else {
        let new_trails: Vec<trailhead_db::NewTrail> =
            all_trails.iter().map(trail_to_new).collect();
        if let Err(err) = trailhead_db::replace_trails(pool, &new_trails).await {
            let message = format!("{err:#}");
            fail_run_best_effort(pool, run.id, "scrape", message).await;
            return Err(err.into());
        }
    }

    let records_i32 = i32::try_from(all_trails.len()).unwrap_or(i32::MAX);
    if let Err(err) = trailhead_db::complete_collection_run(pool, run.id, records_i32).await {
        let message = format!("{err:#}");
        fail_run_best_effort(pool, run.id, "scrape", message).await;
        return Err(err.into());
    }

    println!(
        "Run complete: {} trails from {park_count} park(s)",
        all_trails.len()
    );
    Ok(())
}

/// Load the parks to process for a scrape run.
///
/// When `park_filter` is `Some(code)`, returns only that park (error if it
/// is not present or has no URL). When `None`, returns every park with a
/// site URL.
async fn load_parks_for_scrape(
    pool: &PgPool,
    park_filter: Option<&str>,
) -> anyhow::Result<Vec<trailhead_db::ParkRow>> {
    let all = trailhead_db::list_parks_with_url(pool).await?;
    if all.is_empty() {
        anyhow::bail!("no parks with a site URL in the warehouse; run `trailhead ingest` first");
    }

    match park_filter {
        Some(code) => {
            let park = all
                .into_iter()
                .find(|p| p.park_code == code)
                .ok_or_else(|| {
                    anyhow::anyhow!("park '{code}' not found or has no site URL")
                })?;
            Ok(vec![park])
        }
        None => Ok(all),
    }
}

fn write_side_file(path: &Path, trails: &[Trail]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, trails)?;
    Ok(())
}

fn trail_to_new(trail: &Trail) -> trailhead_db::NewTrail {
    trailhead_db::NewTrail {
        park_code: trail.park_code.clone(),
        park_name: trail.park_name.clone(),
        trail_name: trail.trail_name.clone(),
        description: trail.description.clone(),
        distance: trail.distance.clone(),
        duration: trail.duration.clone(),
        difficulty: trail.difficulty.clone(),
        elevation_gain: trail.elevation_gain.clone(),
        trail_type: trail.trail_type.clone(),
        source_url: trail.source_url.clone(),
        scraped_at: trail.scraped_at,
    }
}
