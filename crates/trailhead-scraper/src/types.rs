//! Domain types for trail extraction.

use chrono::{DateTime, Utc};

/// A hiking trail record extracted from one park web page.
///
/// The five detail fields hold the raw matched substring (`"3.2 miles"`,
/// `"Moderate"`, `"Loop"`) and are `None` when no pattern matched.
/// `trail_name` is never empty: candidates without a name are discarded
/// before construction.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Trail {
    pub park_code: String,
    pub park_name: String,
    pub trail_name: String,
    pub description: String,
    pub distance: Option<String>,
    pub duration: Option<String>,
    pub difficulty: Option<String>,
    pub elevation_gain: Option<String>,
    pub trail_type: Option<String>,
    /// The page this record was extracted from.
    pub source_url: String,
    /// Assigned once per park-scrape invocation; every trail found for a
    /// park carries the same instant.
    pub scraped_at: DateTime<Utc>,
}

/// Identity and canonical site URL of a park to scrape.
#[derive(Debug, Clone)]
pub struct ParkSite {
    pub park_code: String,
    pub park_name: String,
    pub park_url: String,
}
