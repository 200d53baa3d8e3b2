use thiserror::Error;
use url::Url;

/// Errors that can occur during feed-URL validation.
#[derive(Debug, Error)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validates a feed endpoint URL.
///
/// Only `http` and `https` URLs are accepted; `file://`, `ftp://`, `data:`
/// and friends are rejected at configuration load. Localhost and private
/// addresses are deliberately allowed — the endpoint is operator-configured,
/// and test fixtures listen on `127.0.0.1`.
pub fn validate_feed_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}
