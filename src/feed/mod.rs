//! Feed ingestion pipeline: fetch the configured endpoint, normalize the
//! document into plain-text items.
//!
//! The module is organized into four submodules:
//!
//! - [`fetcher`] - one HTTP GET with identifying headers, bounded timeout,
//!   and typed failures; also hosts the pipeline entry point
//! - [`parser`] - Atom/RSS detection and span extraction
//! - [`sanitize`] - entity decoding, CDATA unwrapping, markup stripping
//! - [`types`] - the normalized [`Feed`]/[`FeedItem`] data model
//!
//! Control flow is a single synchronous chain per invocation: fetch (one
//! suspending network call) then normalize (pure text processing). Nothing
//! is shared or cached between invocations.
//!
//! # Example
//!
//! ```ignore
//! use newswire::config::Config;
//! use newswire::feed;
//!
//! let config = Config::default();
//! let client = feed::build_client()?;
//! let feed = feed::fetch_and_normalize(&client, &config).await?;
//! ```

mod fetcher;
mod parser;
mod sanitize;
mod types;

pub use fetcher::{build_client, fetch_and_normalize, fetch_feed, FetchError};
pub use parser::{detect_format, parse_feed, FeedFormat, ParseError};
pub use sanitize::{sanitize, sanitize_opt};
pub use types::{Feed, FeedItem, DEFAULT_FEED_TITLE};
