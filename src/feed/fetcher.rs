use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;

use crate::config::Config;
use crate::feed::parser::{parse_feed, ParseError};
use crate::feed::types::Feed;

/// Content types the endpoint may legitimately answer with, in preference
/// order.
const FEED_ACCEPT: &str = "application/atom+xml, application/rss+xml, application/xml, text/xml";

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_REDIRECTS: usize = 10;

/// Errors that can occur while fetching and normalizing the feed.
///
/// Every failure mode surfaces typed; the pipeline never swallows an error
/// into a silently-empty [`Feed`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response received, but with a non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("response too large")]
    ResponseTooLarge,
    /// Response body lacked a recognizable feed/channel container
    #[error("malformed feed: {0}")]
    Parse(#[from] ParseError),
}

/// Builds the HTTP client the pipeline fetches with.
///
/// Redirects are followed transparently up to a bounded hop count — a 3xx
/// answer from the endpoint is never surfaced to the caller.
pub fn build_client() -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()?;
    Ok(client)
}

/// Fetches the raw feed document from the configured endpoint.
///
/// Sends a single GET carrying the identifying `User-Agent` from `config`,
/// the fixed `Accept` preference list, and `Cache-Control: no-cache` so
/// every call observes a fresh document. No retry is performed here; retry
/// policy, if any, belongs to the caller.
///
/// # Errors
///
/// - [`FetchError::Timeout`] - no response within `config.timeout_secs`
/// - [`FetchError::Network`] - DNS, connection, or TLS failure
/// - [`FetchError::HttpStatus`] - non-2xx response, status code attached
/// - [`FetchError::ResponseTooLarge`] - body exceeded 10MB
pub async fn fetch_feed(client: &reqwest::Client, config: &Config) -> Result<String, FetchError> {
    let request = client
        .get(&config.feed_url)
        .header(reqwest::header::USER_AGENT, config.user_agent.as_str())
        .header(reqwest::header::ACCEPT, FEED_ACCEPT)
        .header(reqwest::header::CACHE_CONTROL, "no-cache");

    let response = tokio::time::timeout(Duration::from_secs(config.timeout_secs), request.send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Fetches the configured feed and normalizes it into a [`Feed`].
///
/// The pipeline entry point: one suspending network call, then pure text
/// processing. The returned value is owned exclusively by the caller and is
/// built fresh on every invocation — nothing is cached between calls.
///
/// # Errors
///
/// Everything [`fetch_feed`] can fail with, plus [`FetchError::Parse`] when
/// the body lacks a `<feed>`/`<channel>` container. An empty `items` vector
/// is a success, not an error.
pub async fn fetch_and_normalize(
    client: &reqwest::Client,
    config: &Config,
) -> Result<Feed, FetchError> {
    let xml = fetch_feed(client, config).await?;
    let feed = parse_feed(&xml)?;
    tracing::debug!(
        title = %feed.title,
        items = feed.items.len(),
        "Normalized feed"
    );
    Ok(feed)
}

/// Reads the response body with a size cap, using stream-based reading so
/// an oversized body is rejected before it is fully buffered.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
