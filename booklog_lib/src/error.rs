//! Error types for the library layer.

use std::fmt;

use crate::scrape::ScrapeError;

/// Errors produced by the library layer, wrapping scrape failures and
/// adding serialization and input validation failures.
#[derive(Debug)]
pub enum BooklogError {
    /// A page could not be acquired or yielded no usable result.
    Scrape(ScrapeError),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for BooklogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scrape(e) => write!(f, "Scrape error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for BooklogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scrape(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<ScrapeError> for BooklogError {
    fn from(e: ScrapeError) -> Self {
        Self::Scrape(e)
    }
}

impl From<serde_json::Error> for BooklogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
