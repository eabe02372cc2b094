//! Error types for page acquisition.

use std::time::Duration;

/// Errors that can occur while loading a page.
///
/// Every variant means "no usable document"; callers surface these as hard
/// failures and never retry automatically.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The target was not an absolute `http`/`https` URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Navigation did not finish within the configured bound.
    #[error("Page load timed out after {0:?}")]
    Timeout(Duration),
    /// An HTTP request failed (network error, TLS, or unreadable body).
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The server returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The headless browser could not be launched or driven.
    #[cfg(feature = "headless")]
    #[error("Browser error: {0}")]
    Browser(String),
}
