//! Utility functions for common operations.
//!
//! - **Text**: Unicode-aware width fitting, control-character stripping,
//!   relative timestamps
//! - **URLs**: validation before handing article links to the browser

mod text;
mod url_validator;

pub use text::{display_width, format_relative_time, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Maximum allowed search query length, shared by the input box and the feed store.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
