//! Database operations for `trail_difficulty_ratings`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A scraped trail that still needs a difficulty rating.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnratedTrailRow {
    pub id: i64,
    pub park_code: String,
    pub trail_name: String,
    pub description: String,
    pub source_url: String,
}

/// A rating to append.
#[derive(Debug, Clone)]
pub struct NewTrailRating {
    pub park_code: String,
    pub trail_name: String,
    pub source_url: Option<String>,
    pub rating: String,
    pub rating_source: String,
}

/// Trails whose page text yielded no difficulty and which have not been
/// rated yet, matched on `(park_code, trail_name)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unrated_trails(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<UnratedTrailRow>, DbError> {
    let rows = sqlx::query_as::<_, UnratedTrailRow>(
        "SELECT t.id, t.park_code, t.trail_name, t.description, t.source_url \
         FROM nps_trails t \
         WHERE t.difficulty IS NULL \
           AND NOT EXISTS ( \
               SELECT 1 FROM trail_difficulty_ratings r \
               WHERE r.park_code = t.park_code AND r.trail_name = t.trail_name \
           ) \
         ORDER BY t.park_code, t.trail_name \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Append ratings (no replacement; the ratings table is additive).
/// One `rated_at` timestamp is bound for the whole batch.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the transaction fails.
pub async fn insert_ratings(pool: &PgPool, ratings: &[NewTrailRating]) -> Result<u64, DbError> {
    let rated_at: DateTime<Utc> = Utc::now();
    let mut tx = pool.begin().await?;

    for rating in ratings {
        sqlx::query(
            "INSERT INTO trail_difficulty_ratings \
                 (park_code, trail_name, source_url, rating, rating_source, rated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&rating.park_code)
        .bind(&rating.trail_name)
        .bind(&rating.source_url)
        .bind(&rating.rating)
        .bind(&rating.rating_source)
        .bind(rated_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(ratings.len() as u64)
}
