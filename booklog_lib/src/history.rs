//! Recent-searches log.
//!
//! One JSON object per line, appended as lookups succeed. The log is a
//! convenience: write and read failures are logged and otherwise ignored.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BookLink, StoreType};

/// One successful lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    /// Store the user asked for, if any.
    pub store: Option<StoreType>,
    pub url: String,
    pub title: String,
    /// Store the chosen link actually belongs to.
    pub store_type: StoreType,
}

impl SearchEntry {
    pub fn new(query: &str, store: Option<StoreType>, link: &BookLink) -> Self {
        Self {
            timestamp: Utc::now(),
            query: query.to_string(),
            store,
            url: link.url.clone(),
            title: link.title.clone(),
            store_type: link.store_type,
        }
    }
}

pub struct SearchHistory {
    path: PathBuf,
}

impl SearchHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends `entry`. Failures are logged, never returned.
    pub fn record(&self, entry: &SearchEntry) {
        if let Err(e) = self.append(entry) {
            tracing::warn!("could not write search history {}: {}", self.path.display(), e);
        }
    }

    fn append(&self, entry: &SearchEntry) -> std::io::Result<()> {
        let line = serde_json::to_string(entry)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    /// The last `n` entries, newest first. Lines that do not parse are
    /// skipped; a missing or unreadable file reads as empty.
    pub fn recent(&self, n: usize) -> Vec<SearchEntry> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("could not read search history {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        let mut entries: Vec<SearchEntry> = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::debug!("skipping history line {}: {}", lineno + 1, e),
            }
        }
        entries.into_iter().rev().take(n).collect()
    }
}
