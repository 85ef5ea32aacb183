//! Database operations for the `nps_trails` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A scraped trail to load.
#[derive(Debug, Clone)]
pub struct NewTrail {
    pub park_code: String,
    pub park_name: String,
    pub trail_name: String,
    pub description: String,
    pub distance: Option<String>,
    pub duration: Option<String>,
    pub difficulty: Option<String>,
    pub elevation_gain: Option<String>,
    pub trail_type: Option<String>,
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,
}

/// Replace the full contents of `nps_trails` with this run's output
/// (truncate-and-load). `loaded_at` is bound once for every row and is
/// distinct from each trail's `scraped_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the transaction fails; the previous run's
/// rows are kept in that case.
pub async fn replace_trails(pool: &PgPool, trails: &[NewTrail]) -> Result<u64, DbError> {
    let loaded_at: DateTime<Utc> = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM nps_trails").execute(&mut *tx).await?;

    for trail in trails {
        sqlx::query(
            "INSERT INTO nps_trails \
                 (park_code, park_name, trail_name, description, distance, duration, \
                  difficulty, elevation_gain, trail_type, source_url, scraped_at, loaded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(&trail.park_code)
        .bind(&trail.park_name)
        .bind(&trail.trail_name)
        .bind(&trail.description)
        .bind(&trail.distance)
        .bind(&trail.duration)
        .bind(&trail.difficulty)
        .bind(&trail.elevation_gain)
        .bind(&trail.trail_type)
        .bind(&trail.source_url)
        .bind(trail.scraped_at)
        .bind(loaded_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(trails.len() as u64)
}
