use thiserror::Error;
use url::Url;

/// Reasons an article URL is refused before being handed to the browser.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL contains control characters")]
    ControlCharacters,
}

/// Validate an upstream-supplied article URL before `open::that`.
///
/// The URL is passed to a platform opener (`xdg-open`, `open`, `start`), so
/// anything but a plain http(s) URL is rejected: `file://`, `javascript:`,
/// and strings smuggling control characters or leading dashes.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    if url_str.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacters);
    }

    let url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}
