//! Library layer for booklog: book search, product scraping, and helpers.
//!
//! Product pages are read by one selector-chain extractor driven by the
//! field tables in [`rules`]; search results are classified by retailer and
//! reduced to a single [`BookLink`]. Page loading lives in `booklog_page`.

pub mod asin;
pub mod assemble;
pub mod classify;
pub mod config;
pub mod emoji;
pub mod error;
pub mod events;
pub mod extract;
pub mod history;
pub mod rules;
pub mod scrape;
pub mod types;
pub mod validation;

pub use booklog_page;

pub use config::ScrapeConfig;
pub use emoji::{EmojiConfig, EmojiSuggester};
pub use error::BooklogError;
pub use events::{Event, EventSink, RecordingSink, ScrapeCtx};
pub use extract::{ExtractionField, ExtractionResult, SelectorRule, NOT_FOUND};
pub use history::{SearchEntry, SearchHistory};
pub use scrape::{ScrapeClient, ScrapeError};
pub use types::{BookLink, ProductRecord, RawLink, StoreType};
