//! Difficulty-rating command handler.
//!
//! Rates trails whose page text matched no difficulty vocabulary, one at a
//! time with a short pacing delay. Per-trail failures are logged and
//! skipped; ratings are appended, never replaced.

use std::collections::BTreeMap;
use std::time::Duration;

use sqlx::PgPool;
use trailhead_core::AppConfig;
use trailhead_rater::{RaterClient, RATING_SOURCE};

use crate::fail_run_best_effort;

/// Pacing delay between rating requests.
const RATING_DELAY: Duration = Duration::from_millis(500);

/// Rate up to `limit` unrated trails and append the results, tracked as one
/// collection run.
///
/// # Errors
///
/// Returns an error if the API key is missing, the collection run cannot be
/// created, every trail fails to rate, or the append fails.
pub(crate) async fn run_rate(pool: &PgPool, config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let api_key = config
        .anthropic_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("ANTHROPIC_API_KEY must be set for the rate command"))?;

    let unrated = trailhead_db::list_unrated_trails(pool, limit).await?;
    if unrated.is_empty() {
        println!("No unrated trails; nothing to do.");
        return Ok(());
    }

    let client = RaterClient::new(api_key, &config.rater_model, config.rater_request_timeout_secs)?;

    println!("Rating {} trail(s)...", unrated.len());

    let run = trailhead_db::create_collection_run(pool, "rate", "cli").await?;
    if let Err(e) = trailhead_db::start_collection_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, "rate", format!("{e:#}")).await;
        return Err(e.into());
    }

    let mut ratings: Vec<trailhead_db::NewTrailRating> = Vec::new();
    let total = unrated.len();

    for (idx, trail) in unrated.iter().enumerate() {
        match client
            .rate_trail(&trail.trail_name, &trail.description, &trail.source_url)
            .await
        {
            Ok(rating) => {
                println!(
                    "  \u{2713} [{}/{total}] {:<40} {rating}",
                    idx + 1,
                    truncate(&trail.trail_name, 40)
                );
                ratings.push(trailhead_db::NewTrailRating {
                    park_code: trail.park_code.clone(),
                    trail_name: trail.trail_name.clone(),
                    source_url: Some(trail.source_url.clone()),
                    rating,
                    rating_source: RATING_SOURCE.to_string(),
                });
            }
            Err(e) => {
                tracing::error!(trail = %trail.trail_name, error = %e, "rating failed");
                println!(
                    "  \u{2717} [{}/{total}] {:<40} {e:#}",
                    idx + 1,
                    truncate(&trail.trail_name, 40)
                );
            }
        }

        tokio::time::sleep(RATING_DELAY).await;
    }

    if ratings.is_empty() {
        let message = format!("all {total} trails failed rating");
        fail_run_best_effort(pool, run.id, "rate", message.clone()).await;
        anyhow::bail!("{message}");
    }

    if let Err(err) = trailhead_db::insert_ratings(pool, &ratings).await {
        let message = format!("{err:#}");
        fail_run_best_effort(pool, run.id, "rate", message).await;
        return Err(err.into());
    }

    let records_i32 = i32::try_from(ratings.len()).unwrap_or(i32::MAX);
    if let Err(err) = trailhead_db::complete_collection_run(pool, run.id, records_i32).await {
        let message = format!("{err:#}");
        fail_run_best_effort(pool, run.id, "rate", message).await;
        return Err(err.into());
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rating in &ratings {
        *counts.entry(rating.rating.as_str()).or_default() += 1;
    }
    let summary: Vec<String> = counts
        .iter()
        .map(|(rating, count)| format!("{rating}: {count}"))
        .collect();
    println!(
        "Rated {} of {total} trail(s) ({})",
        ratings.len(),
        summary.join(", ")
    );

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{truncated}...")
    }
}
