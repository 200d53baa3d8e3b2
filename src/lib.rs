//! Feed ingestion and normalization for daily developer news.
//!
//! The crate wraps one pipeline: fetch the configured RSS/Atom endpoint
//! (GeekNews by default), detect which of the two formats came back, and
//! normalize it into a [`feed::Feed`] of plain-text items that downstream
//! consumers can persist or enrich.
//!
//! Entry point: [`feed::fetch_and_normalize`]. The endpoint, identifying
//! `User-Agent`, and fetch timeout live in [`config::Config`], so tests can
//! point the pipeline at a local fixture server.

pub mod config;
pub mod feed;
pub mod util;
