//! Shared utilities.
//!
//! Currently just feed-URL validation, applied once at configuration load
//! so a bad endpoint fails before a client ever dials it.

mod url_validator;

pub use url_validator::{validate_feed_url, UrlValidationError};
