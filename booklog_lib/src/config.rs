//! Environment-driven settings for the scrapers.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_HISTORY_PATH: &str = "booklog_history.jsonl";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Scraper settings.
///
/// | variable               | default                         |
/// |------------------------|---------------------------------|
/// | `BOOKLOG_TIMEOUT_SECS` | 30                              |
/// | `BOOKLOG_SEARCH_URL`   | `https://www.google.com/search` |
/// | `BOOKLOG_USER_AGENT`   | rotating browser user agents    |
/// | `BOOKLOG_HEADLESS`     | off                             |
/// | `BOOKLOG_HISTORY_PATH` | `booklog_history.jsonl`         |
#[derive(Clone, Debug)]
pub struct ScrapeConfig {
    /// Bound on each page load.
    pub timeout: Duration,
    /// Search endpoint; the query is appended as `q`.
    pub search_url: String,
    /// Pinned user agent. `None` rotates through built-in browser identities.
    pub user_agent: Option<String>,
    /// Render pages in headless Chrome (needs the `headless` feature).
    pub headless: bool,
    /// Where the recent-searches log lives.
    pub history_path: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: None,
            headless: false,
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
        }
    }
}

impl ScrapeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: Duration::from_secs(env_u64("BOOKLOG_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
            search_url: env_string("BOOKLOG_SEARCH_URL").unwrap_or(defaults.search_url),
            user_agent: env_string("BOOKLOG_USER_AGENT"),
            headless: env_flag("BOOKLOG_HEADLESS"),
            history_path: env_string("BOOKLOG_HISTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_path),
        }
    }

    pub fn with_search_url(mut self, search_url: &str) -> Self {
        self.search_url = search_url.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ScrapeConfig::default();
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.search_url, DEFAULT_SEARCH_URL);
        assert!(cfg.user_agent.is_none());
        assert!(!cfg.headless);
    }

    #[test]
    fn builders_override() {
        let cfg = ScrapeConfig::default()
            .with_search_url("http://127.0.0.1:9999/search")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(cfg.search_url, "http://127.0.0.1:9999/search");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn unset_variables_fall_back() {
        assert_eq!(env_u64("BOOKLOG_TEST_UNSET_U64", 7), 7);
        assert!(env_string("BOOKLOG_TEST_UNSET_STRING").is_none());
        assert!(!env_flag("BOOKLOG_TEST_UNSET_FLAG"));
    }
}
