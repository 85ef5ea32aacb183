//! Low-level HTTP fetch for park web pages.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;

/// Build the shared HTTP client with the configured timeout and user agent.
///
/// # Errors
///
/// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
/// cannot be constructed.
pub fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, ScraperError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Fetch the HTML body of a URL.
///
/// Candidate pages frequently do not exist, so callers treat every error
/// from this function the same as a page with nothing extractable.
///
/// # Errors
///
/// - [`ScraperError::UnexpectedStatus`] on any non-2xx response.
/// - [`ScraperError::Http`] on timeout, connection, or body-read failure.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String, ScraperError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response.text().await?)
}
