//! HTTP client for the NPS REST API.
//!
//! Wraps `reqwest` with API key management, offset pagination, and the
//! events-endpoint deduplication loop. All endpoints share one envelope
//! shape (`{total, limit, start, data}`); only `data` is consumed.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::NpsError;
use crate::types::{ApiPage, Endpoint, ParkRecord};

const DEFAULT_BASE_URL: &str = "https://developer.nps.gov/api/v1/";

/// Offset-pagination page size used for every endpoint.
const PAGE_LIMIT: usize = 50;

/// Park codes of the designated national parks, sorted alphabetically.
/// The events endpoint requires an explicit `parkCode` filter; without it
/// the feed is dominated by monuments and historic sites.
const NATIONAL_PARK_CODES: &[&str] = &[
    "acad", "arch", "badl", "bibe", "bisc", "blca", "brca", "cany", "care", "cave",
    "chis", "cong", "crla", "cuva", "dena", "drto", "deva", "ever", "gaar", "gate",
    "glac", "glba", "grba", "grca", "grsa", "grte", "grsm", "gumo", "hale", "havo",
    "hosp", "indu", "isro", "jotr", "katm", "kefj", "kica", "kova", "lacl", "lavo",
    "maca", "meve", "mora", "neri", "npsa", "olym", "pefo", "pinn", "redw", "romo",
    "sagu", "seki", "shen", "thro", "viis", "voya", "whsa", "wica", "wrst", "yell",
    "yose", "zion",
];

/// Client for the NPS REST API.
///
/// Use [`NpsClient::new`] for production or [`NpsClient::with_base_url`] to
/// point at a mock server in tests.
pub struct NpsClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl NpsClient {
    /// Creates a new client pointed at the production NPS API.
    ///
    /// # Errors
    ///
    /// Returns [`NpsError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, NpsError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NpsError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`NpsError::InvalidBaseUrl`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NpsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("trailhead/0.1 (park-data-pipeline)")
            .build()?;

        // Normalise: the base must end in exactly one slash so endpoint
        // paths join under it rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NpsError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches every record from an endpoint by walking offset pages until
    /// an empty page is returned.
    ///
    /// The events endpoint additionally filters to the national-park code
    /// list with `dateEnd = today`, deduplicates items by `id`, and stops
    /// as soon as a page contributes no new ids — the upstream feed cycles
    /// rather than terminating.
    ///
    /// # Errors
    ///
    /// - [`NpsError::UnexpectedStatus`] on any non-2xx response.
    /// - [`NpsError::Http`] on network failure.
    /// - [`NpsError::Deserialize`] if a page body is not the expected envelope.
    pub async fn fetch_all(&self, endpoint: Endpoint) -> Result<Vec<serde_json::Value>, NpsError> {
        let mut all_items = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut start = 0usize;

        loop {
            let items = self.fetch_page(endpoint, start, PAGE_LIMIT).await?;
            if items.is_empty() {
                break;
            }

            if endpoint == Endpoint::Events {
                let mut new_count = 0usize;
                for item in items {
                    let Some(id) = item.get("id").and_then(serde_json::Value::as_str) else {
                        continue;
                    };
                    if seen_ids.insert(id.to_owned()) {
                        all_items.push(item);
                        new_count += 1;
                    }
                }
                tracing::debug!(
                    endpoint = %endpoint,
                    new_count,
                    total_unique = all_items.len(),
                    "fetched events page"
                );
                if new_count == 0 {
                    break;
                }
            } else {
                all_items.extend(items);
                tracing::debug!(endpoint = %endpoint, fetched = all_items.len(), "fetched page");
            }

            start += PAGE_LIMIT;
        }

        tracing::info!(endpoint = %endpoint, total = all_items.len(), "endpoint fetch complete");
        Ok(all_items)
    }

    /// Fetches the full park list and maps each item into a [`ParkRecord`].
    ///
    /// Items without a usable `parkCode` or `fullName` are skipped with a
    /// warning rather than failing the whole fetch.
    ///
    /// # Errors
    ///
    /// Propagates any [`fetch_all`](Self::fetch_all) error.
    pub async fn parks(&self) -> Result<Vec<ParkRecord>, NpsError> {
        let items = self.fetch_all(Endpoint::Parks).await?;
        let total = items.len();

        let parks: Vec<ParkRecord> = items
            .into_iter()
            .filter_map(|item| {
                let record = ParkRecord::from_item(item);
                if record.is_none() {
                    tracing::warn!("skipping parks item without parkCode/fullName");
                }
                record
            })
            .collect();

        tracing::info!(parks = parks.len(), total, "park list fetched");
        Ok(parks)
    }

    /// Fetches one page of an endpoint and returns its `data` items.
    async fn fetch_page(
        &self,
        endpoint: Endpoint,
        start: usize,
        limit: usize,
    ) -> Result<Vec<serde_json::Value>, NpsError> {
        let url = self.build_url(endpoint, start, limit)?;

        let response = self
            .client
            .get(url.clone())
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NpsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let page: ApiPage = serde_json::from_str(&body).map_err(|e| NpsError::Deserialize {
            context: format!("{endpoint} page at start={start}"),
            source: e,
        })?;

        Ok(page.data)
    }

    /// Builds the request URL for one page, including the events-endpoint
    /// park filter and date bound.
    fn build_url(&self, endpoint: Endpoint, start: usize, limit: usize) -> Result<Url, NpsError> {
        let mut url =
            self.base_url
                .join(endpoint.path())
                .map_err(|e| NpsError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;

        {
            let mut pairs = url.query_pairs_mut();
            if endpoint == Endpoint::Events {
                pairs.append_pair("parkCode", &NATIONAL_PARK_CODES.join(","));
                pairs.append_pair(
                    "dateEnd",
                    &chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string(),
                );
            }
            pairs.append_pair("start", &start.to_string());
            pairs.append_pair("limit", &limit.to_string());
        }

        Ok(url)
    }
}
