//! Page acquisition: turns a URL into a queryable [`Document`].

#[cfg(feature = "headless")]
mod browser;
mod client;
mod document;
mod errors;
mod user_agent;
pub use self::client::{AcquireOptions, PageClient, DEFAULT_TIMEOUT};
pub use self::document::Document;
pub use self::errors::Error;
pub use self::user_agent::get_user_agent;
pub use scraper;
