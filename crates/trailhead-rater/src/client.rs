//! HTTP client for the Anthropic Messages API, specialised to one task:
//! rating a trail description as Easy, Moderate, or Difficult.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::RaterError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 100;

/// Value recorded in the warehouse's `rating_source` column.
pub const RATING_SOURCE: &str = "claude_api";

/// The only ratings the model is allowed to answer with. Anything else is
/// treated as a refusal to follow the format and falls back to Moderate.
pub const VALID_RATINGS: &[&str] = &["Easy", "Moderate", "Difficult"];

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Client for the difficulty-rating model.
///
/// Use [`RaterClient::new`] for production or [`RaterClient::with_base_url`]
/// to point at a mock server in tests.
pub struct RaterClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl RaterClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`RaterError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, RaterError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RaterError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RaterError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, RaterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| RaterError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    /// Rate one trail, returning `"Easy"`, `"Moderate"`, or `"Difficult"`.
    ///
    /// A syntactically valid answer outside the allowed vocabulary logs a
    /// warning and falls back to `"Moderate"`.
    ///
    /// # Errors
    ///
    /// - [`RaterError::ApiStatus`] on any non-2xx response.
    /// - [`RaterError::Http`] on network failure.
    /// - [`RaterError::Deserialize`] if the body is not a messages response.
    /// - [`RaterError::EmptyResponse`] if no text block is present.
    pub async fn rate_trail(
        &self,
        trail_name: &str,
        description: &str,
        source_url: &str,
    ) -> Result<String, RaterError> {
        let url = self
            .base_url
            .join("v1/messages")
            .map_err(|e| RaterError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: rating_prompt(trail_name, description, source_url),
            }],
        };

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&body);
            return Err(RaterError::ApiStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse =
            serde_json::from_str(&body).map_err(|e| RaterError::Deserialize {
                context: format!("rating response for \"{trail_name}\""),
                source: e,
            })?;

        let answer = parsed
            .content
            .iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text.trim().to_string())
            .ok_or(RaterError::EmptyResponse)?;

        Ok(validate_rating(trail_name, &answer))
    }
}

/// Build the fixed one-word rating prompt.
fn rating_prompt(trail_name: &str, description: &str, source_url: &str) -> String {
    let description = if description.trim().is_empty() {
        "No description available"
    } else {
        description
    };

    format!(
        "Rate this hike as Easy, Moderate, or Difficult based on the description.\n\n\
         Title: {trail_name}\n\n\
         {description}\n\n\
         URL: {source_url}\n\n\
         Respond with ONLY one word: Easy, Moderate, or Difficult."
    )
}

/// Clamp the model's answer to the allowed vocabulary, defaulting to
/// Moderate on anything unexpected.
fn validate_rating(trail_name: &str, answer: &str) -> String {
    if VALID_RATINGS.contains(&answer) {
        answer.to_string()
    } else {
        tracing::warn!(
            trail = %trail_name,
            answer = %answer,
            "unexpected rating answer; defaulting to Moderate"
        );
        "Moderate".to_string()
    }
}

/// Pull the error message out of an API error body, falling back to the
/// raw body when it is not the documented shape.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_title_description_and_format_instruction() {
        let prompt = rating_prompt(
            "Bright Angel Trail",
            "Steep descent below the rim.",
            "https://www.nps.gov/grca/planyourvisit/hiking.htm",
        );
        assert!(prompt.contains("Title: Bright Angel Trail"));
        assert!(prompt.contains("Steep descent below the rim."));
        assert!(prompt.contains("ONLY one word"));
    }

    #[test]
    fn prompt_substitutes_placeholder_for_empty_description() {
        let prompt = rating_prompt("Rim Trail", "   ", "https://example.gov");
        assert!(prompt.contains("No description available"));
    }

    #[test]
    fn valid_ratings_pass_through() {
        for rating in VALID_RATINGS {
            assert_eq!(validate_rating("t", rating), *rating);
        }
    }

    #[test]
    fn unexpected_answers_default_to_moderate() {
        assert_eq!(validate_rating("t", "Very Hard"), "Moderate");
        assert_eq!(validate_rating("t", "easy"), "Moderate");
        assert_eq!(validate_rating("t", ""), "Moderate");
    }

    #[test]
    fn api_error_message_reads_documented_shape() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        assert_eq!(api_error_message(body), "invalid x-api-key");
    }

    #[test]
    fn api_error_message_falls_back_to_raw_body() {
        assert_eq!(api_error_message("boom"), "boom");
    }
}
