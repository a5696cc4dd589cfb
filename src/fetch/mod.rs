//! HTTP fetch collaborator
//!
//! The engine and the scrape operation only see the [`PageFetcher`] trait.
//! [`HttpFetcher`] is the `reqwest`-backed implementation used in production.

pub mod http_fetcher;
pub mod types;

pub use http_fetcher::HttpFetcher;
pub use types::{FetchError, FetchedPage, PageFetcher};
