//! Database operations for the `nps_raw_records` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// Replace every stored record for one endpoint with this run's items
/// (full replace, scoped to the endpoint). `external_id` is taken from the
/// item's `id` field when present.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the transaction fails; the endpoint's
/// previous rows are kept in that case.
pub async fn replace_endpoint_records(
    pool: &PgPool,
    endpoint: &str,
    records: &[serde_json::Value],
) -> Result<u64, DbError> {
    let loaded_at: DateTime<Utc> = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM nps_raw_records WHERE endpoint = $1")
        .bind(endpoint)
        .execute(&mut *tx)
        .await?;

    for record in records {
        let external_id = record.get("id").and_then(serde_json::Value::as_str);
        sqlx::query(
            "INSERT INTO nps_raw_records (endpoint, external_id, raw_data, loaded_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(endpoint)
        .bind(external_id)
        .bind(record)
        .bind(loaded_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(records.len() as u64)
}
