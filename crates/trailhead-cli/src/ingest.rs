//! NPS API ingest command handler.
//!
//! Fetches one or all API endpoints and replaces each endpoint's warehouse
//! table contents. Per-endpoint failures are logged and skipped rather than
//! propagated so one broken feed does not abort the full run.

use sqlx::PgPool;
use trailhead_core::AppConfig;
use trailhead_nps::{Endpoint, NpsClient, ParkRecord};

use crate::fail_run_best_effort;

/// Request timeout for API calls.
const API_TIMEOUT_SECS: u64 = 30;

/// Fetch NPS API data and load it into the warehouse (full replace per
/// endpoint), tracked as one collection run.
///
/// # Errors
///
/// Returns an error if the API key is missing, the collection run cannot be
/// created, every endpoint fails, or the run cannot be completed.
pub(crate) async fn run_ingest(
    pool: &PgPool,
    config: &AppConfig,
    only: Option<Endpoint>,
) -> anyhow::Result<()> {
    let api_key = config
        .nps_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("NPS_API_KEY must be set for the ingest command"))?;

    let client = NpsClient::new(api_key, API_TIMEOUT_SECS)?;

    let endpoints: Vec<Endpoint> = match only {
        Some(endpoint) => vec![endpoint],
        None => Endpoint::ALL.to_vec(),
    };

    println!("Ingesting {} endpoint(s)...", endpoints.len());

    let run = trailhead_db::create_collection_run(pool, "ingest", "cli").await?;
    if let Err(e) = trailhead_db::start_collection_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, "ingest", format!("{e:#}")).await;
        return Err(e.into());
    }

    let mut total_records: i64 = 0;
    let mut failed_endpoints: usize = 0;

    for endpoint in &endpoints {
        match ingest_endpoint(pool, &client, *endpoint).await {
            Ok(count) => {
                total_records = total_records.saturating_add(count);
                println!("  \u{2713} {:<16} {count} records", endpoint.to_string());
            }
            Err(e) => {
                failed_endpoints += 1;
                tracing::error!(endpoint = %endpoint, error = %e, "endpoint ingest failed");
                println!("  \u{2717} {:<16} {e:#}", endpoint.to_string());
            }
        }
    }

    if failed_endpoints == endpoints.len() {
        let message = format!("all {failed_endpoints} endpoints failed ingest");
        fail_run_best_effort(pool, run.id, "ingest", message.clone()).await;
        anyhow::bail!("{message}");
    }

    let records_i32 = i32::try_from(total_records).unwrap_or(i32::MAX);
    if let Err(err) = trailhead_db::complete_collection_run(pool, run.id, records_i32).await {
        let message = format!("{err:#}");
        fail_run_best_effort(pool, run.id, "ingest", message).await;
        return Err(err.into());
    }

    println!("Ingest complete: {total_records} records across {} endpoint(s)", endpoints.len());
    Ok(())
}

/// Fetch one endpoint and replace its warehouse contents. Parks get typed
/// columns; every other endpoint lands as raw records.
async fn ingest_endpoint(
    pool: &PgPool,
    client: &NpsClient,
    endpoint: Endpoint,
) -> anyhow::Result<i64> {
    if endpoint == Endpoint::Parks {
        let parks = client.parks().await?;
        let new_parks: Vec<trailhead_db::NewPark> =
            parks.into_iter().map(park_to_new).collect();
        let count = trailhead_db::replace_parks(pool, &new_parks).await?;
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    } else {
        let items = client.fetch_all(endpoint).await?;
        let count = trailhead_db::replace_endpoint_records(pool, endpoint.table(), &items).await?;
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

fn park_to_new(park: ParkRecord) -> trailhead_db::NewPark {
    trailhead_db::NewPark {
        park_code: park.park_code,
        park_name: park.park_name,
        park_url: park.park_url,
        states: park.states,
        designation: park.designation,
        raw_data: park.raw,
    }
}
