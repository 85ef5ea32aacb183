//! Candidate hiking-page discovery for one park site.
//!
//! Parks publish trail information under a handful of conventional paths;
//! the fixed list below is augmented with links found on the park's
//! plan-your-visit index page whose anchor text mentions hiking.

use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::fetch;

/// Conventional hiking-page paths tried for every park, relative to the
/// park's base path.
const CANDIDATE_PATHS: &[&str] = &[
    "/planyourvisit/hiking.htm",
    "/planyourvisit/day-hiking.htm",
    "/planyourvisit/trails.htm",
    "/planyourvisit/dayhikes.htm",
    "/planyourvisit/backcountry-hiking.htm",
    "/thingstodo.htm",
];

/// Anchor-text keywords that mark a link as hiking-related.
const LINK_TEXT_HINTS: &[&str] = &["hike", "hikes", "trail", "trails", "walk", "walks"];

/// Compute a park's base path from its canonical URL: strip the trailing
/// segment when the URL ends in a page extension, otherwise strip the
/// trailing slash.
#[must_use]
pub fn base_url(park_url: &str) -> String {
    let trimmed = park_url.trim_end_matches('/');
    if trimmed.ends_with(".htm") || trimmed.ends_with(".html") {
        match trimmed.rsplit_once('/') {
            Some((base, _)) => base.to_string(),
            None => trimmed.to_string(),
        }
    } else {
        trimmed.to_string()
    }
}

/// Enumerate candidate hiking pages for a park: the conventional paths
/// under its base, plus hiking-related links discovered on its
/// plan-your-visit index page. Index fetch failure is absorbed — the fixed
/// candidates are still returned.
pub async fn discover_candidate_pages(client: &Client, park_url: &str) -> Vec<String> {
    let base = base_url(park_url);
    let mut pages: Vec<String> = CANDIDATE_PATHS
        .iter()
        .map(|path| format!("{base}{path}"))
        .collect();

    let index_url = format!("{base}/planyourvisit/index.htm");
    match fetch::fetch_html(client, &index_url).await {
        Ok(body) => collect_hiking_links(&body, &index_url, &mut pages),
        Err(e) => {
            tracing::debug!(url = %index_url, error = %e, "could not check plan-your-visit index");
        }
    }

    pages
}

/// Scan the index page's anchors and append resolved hiking-related links
/// that are not already candidates.
fn collect_hiking_links(html: &str, index_url: &str, pages: &mut Vec<String>) {
    let Ok(index_base) = Url::parse(index_url) else {
        return;
    };

    let doc = Html::parse_document(html);
    let anchor_sel = Selector::parse("a[href]").expect("valid selector");

    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = anchor.text().collect::<String>().to_lowercase();
        if !LINK_TEXT_HINTS.iter().any(|hint| text.contains(hint)) {
            continue;
        }
        let Ok(resolved) = index_base.join(href) else {
            continue;
        };
        let resolved = resolved.to_string();
        if !pages.contains(&resolved) {
            pages.push(resolved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_strips_trailing_page_segment() {
        assert_eq!(
            base_url("https://example.gov/park/index.htm"),
            "https://example.gov/park"
        );
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        assert_eq!(base_url("https://example.gov/park/"), "https://example.gov/park");
    }

    #[test]
    fn base_url_leaves_plain_urls_alone() {
        assert_eq!(base_url("https://example.gov/park"), "https://example.gov/park");
    }

    #[test]
    fn base_url_handles_html_extension() {
        assert_eq!(
            base_url("https://example.gov/park/home.html"),
            "https://example.gov/park"
        );
    }

    #[test]
    fn candidate_paths_include_conventional_hiking_page() {
        let base = base_url("https://example.gov/park/index.htm");
        let first = format!("{base}{}", CANDIDATE_PATHS[0]);
        assert_eq!(first, "https://example.gov/park/planyourvisit/hiking.htm");
    }

    #[test]
    fn hiking_links_are_resolved_and_appended() {
        let html = r#"
            <a href="best-day-hikes.htm">Best Day Hikes</a>
            <a href="/grca/planyourvisit/rim-walks.htm">Rim Walks</a>
            <a href="camping.htm">Campgrounds</a>
        "#;
        let mut pages = vec![];
        collect_hiking_links(
            html,
            "https://www.nps.gov/grca/planyourvisit/index.htm",
            &mut pages,
        );

        assert_eq!(
            pages,
            vec![
                "https://www.nps.gov/grca/planyourvisit/best-day-hikes.htm".to_string(),
                "https://www.nps.gov/grca/planyourvisit/rim-walks.htm".to_string(),
            ],
            "hiking links resolved relative to the index page; others skipped"
        );
    }

    #[test]
    fn already_known_urls_are_not_duplicated() {
        let html = r#"<a href="hiking.htm">Hiking</a>"#;
        let mut pages = vec!["https://www.nps.gov/grca/planyourvisit/hiking.htm".to_string()];
        collect_hiking_links(
            html,
            "https://www.nps.gov/grca/planyourvisit/index.htm",
            &mut pages,
        );
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn anchor_text_match_is_case_insensitive() {
        let html = r#"<a href="trails.htm">TRAIL CONDITIONS</a>"#;
        let mut pages = vec![];
        collect_hiking_links(
            html,
            "https://www.nps.gov/grca/planyourvisit/index.htm",
            &mut pages,
        );
        assert_eq!(pages.len(), 1);
    }
}
