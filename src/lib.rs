//! Metadata extraction for flipnotes hosted on Sudomemo.
//!
//! Given a `sudomemo.net/watch/...` or `flipnot.es/...` URL, the extractor
//! fetches the watch page and turns it into a [`Metadata`] record: id, title,
//! the playable MP4, thumbnail and creator. Fetching is pluggable through
//! [`Fetch`]; [`HttpFetcher`] is the default `reqwest` implementation.

pub mod config;
pub mod download;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod page;
pub mod query;
pub mod sudomemo;
pub mod types;
pub mod ui;
pub mod utils;

pub use error::{Error, ExtractionError, Result};
pub use extractor::{Extractor, ExtractorRegistry};
pub use fetch::{Fetch, HttpFetcher};
pub use sudomemo::{extract_from_html, match_url, SudomemoExtractor, UrlMatch};
pub use types::{Format, Metadata, Thumbnail};
