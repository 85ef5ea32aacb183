//! Per-park scrape orchestration.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;

use crate::discovery;
use crate::fetch;
use crate::page::{extract_trails, PageContext};
use crate::types::{ParkSite, Trail};

/// Scrape every candidate hiking page of one park and return the
/// aggregated trails.
///
/// Each candidate URL is visited at most once. A page that cannot be
/// fetched contributes zero trails and is logged at debug — most parks
/// publish only a subset of the conventional paths. The politeness delay is
/// applied after every candidate page, fetched successfully or not. Every
/// returned trail carries the same `scraped_at` instant, assigned once per
/// invocation.
pub async fn scrape_park(client: &Client, park: &ParkSite, politeness_delay: Duration) -> Vec<Trail> {
    let scraped_at = chrono::Utc::now();
    let candidates = discovery::discover_candidate_pages(client, &park.park_url).await;

    let mut visited: HashSet<String> = HashSet::new();
    let mut trails: Vec<Trail> = Vec::new();

    for url in candidates {
        if !visited.insert(url.clone()) {
            continue;
        }

        match fetch::fetch_html(client, &url).await {
            Ok(body) => {
                let ctx = PageContext {
                    park_code: &park.park_code,
                    park_name: &park.park_name,
                    url: &url,
                    scraped_at,
                };
                let page_trails = extract_trails(&body, &ctx);
                if !page_trails.is_empty() {
                    tracing::debug!(
                        park = %park.park_code,
                        url = %url,
                        count = page_trails.len(),
                        "extracted trails from page"
                    );
                }
                trails.extend(page_trails);
            }
            Err(e) => {
                tracing::debug!(park = %park.park_code, url = %url, error = %e, "could not scrape candidate page");
            }
        }

        tokio::time::sleep(politeness_delay).await;
    }

    tracing::info!(park = %park.park_code, trails = trails.len(), "park scrape complete");
    trails
}
