//! Database operations for the `nps_parks` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from `nps_parks` as consumed by the scrape pipeline.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParkRow {
    pub id: i64,
    pub park_code: String,
    pub park_name: String,
    pub park_url: Option<String>,
    pub states: Option<String>,
    pub designation: Option<String>,
}

/// A park record to load, typed columns plus the raw API payload.
#[derive(Debug, Clone)]
pub struct NewPark {
    pub park_code: String,
    pub park_name: String,
    pub park_url: Option<String>,
    pub states: Option<String>,
    pub designation: Option<String>,
    pub raw_data: serde_json::Value,
}

/// Replace the full contents of `nps_parks` with this run's park list
/// (truncate-and-load). One load timestamp is bound for every row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the transaction fails; nothing is replaced
/// in that case.
pub async fn replace_parks(pool: &PgPool, parks: &[NewPark]) -> Result<u64, DbError> {
    let loaded_at: DateTime<Utc> = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM nps_parks").execute(&mut *tx).await?;

    for park in parks {
        sqlx::query(
            "INSERT INTO nps_parks \
                 (park_code, park_name, park_url, states, designation, raw_data, loaded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&park.park_code)
        .bind(&park.park_name)
        .bind(&park.park_url)
        .bind(&park.states)
        .bind(&park.designation)
        .bind(&park.raw_data)
        .bind(loaded_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(parks.len() as u64)
}

/// The parks eligible for scraping: rows with a non-null, non-empty URL,
/// ordered by park code.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_parks_with_url(pool: &PgPool) -> Result<Vec<ParkRow>, DbError> {
    let rows = sqlx::query_as::<_, ParkRow>(
        "SELECT id, park_code, park_name, park_url, states, designation \
         FROM nps_parks \
         WHERE park_url IS NOT NULL AND park_url <> '' \
         ORDER BY park_code",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
