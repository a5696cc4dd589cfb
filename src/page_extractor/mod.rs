//! HTML extraction collaborator
//!
//! Static-HTML helpers used by the content pipeline: document title, plain
//! text for screening, and readable markdown for passage chunking.

pub mod extractors;
pub mod readable;
pub mod schema;

pub use extractors::{extract_page, extract_title, to_plain_text};
pub use readable::to_readable_markdown;
pub use schema::ExtractedPage;
