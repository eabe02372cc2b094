//! Records produced by the scrapers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Retailer a link belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    Amazon,
    Goodreads,
    BarnesNoble,
    Bookshop,
}

impl StoreType {
    pub const ALL: [StoreType; 4] = [
        StoreType::Amazon,
        StoreType::Goodreads,
        StoreType::BarnesNoble,
        StoreType::Bookshop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Amazon => "amazon",
            StoreType::Goodreads => "goodreads",
            StoreType::BarnesNoble => "barnesnoble",
            StoreType::Bookshop => "bookshop",
        }
    }

    /// Domain used to restrict a web search to this retailer.
    pub fn site(&self) -> &'static str {
        match self {
            StoreType::Amazon => "amazon.com",
            StoreType::Goodreads => "goodreads.com",
            StoreType::BarnesNoble => "barnesandnoble.com",
            StoreType::Bookshop => "bookshop.org",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amazon" => Ok(StoreType::Amazon),
            "goodreads" => Ok(StoreType::Goodreads),
            "barnesnoble" | "barnes-noble" | "bn" => Ok(StoreType::BarnesNoble),
            "bookshop" => Ok(StoreType::Bookshop),
            _ => Err(()),
        }
    }
}

/// An anchor pulled off a search-results page, before classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLink {
    pub url: String,
    pub title: String,
}

impl RawLink {
    pub fn new(url: &str, title: &str) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
        }
    }
}

/// A search result recognized as belonging to a known retailer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookLink {
    pub url: String,
    pub title: String,
    pub store_type: StoreType,
}

/// Product metadata scraped from a retailer page.
///
/// Every field is populated; values that could not be found hold the
/// `"Not found"` placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub asin: String,
    pub title: String,
    pub author: String,
    pub year_published: String,
    pub page_length: String,
    pub description: String,
    /// The page the record was scraped from, verbatim.
    pub source_url: String,
}
