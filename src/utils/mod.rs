pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{collapse_whitespace, estimate_size, safe_truncate_chars};
pub use url_utils::{UrlError, canonicalize, host_of, normalize_url};
