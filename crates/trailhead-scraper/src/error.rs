use thiserror::Error;

/// Errors that can occur while fetching a park web page.
///
/// Callers above the page fetcher treat every variant the same way: the
/// page is unavailable and contributes zero trails.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}
