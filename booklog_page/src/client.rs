//! Page acquisition client.

use std::time::Duration;

use url::Url;

use crate::{user_agent::get_user_agent, Document, Error};

/// Default bound on a single page load.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call acquisition settings.
#[derive(Clone, Debug)]
pub struct AcquireOptions {
    /// CSS selector the page must show before it counts as loaded.
    /// Only the headless backend can wait; the HTTP backend ignores it.
    pub wait_for: Option<String>,
    /// Upper bound on navigation (and on the selector wait, if any).
    pub timeout: Duration,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            wait_for: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AcquireOptions {
    pub fn with_wait_for(mut self, selector: &str) -> Self {
        self.wait_for = Some(selector.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    Http,
    #[cfg(feature = "headless")]
    Browser,
}

/// Loads pages and hands them back as [`Document`]s.
///
/// Sends requests with browser-like headers and a randomized user agent
/// unless one is pinned with [`PageClient::with_user_agent`]. Each call
/// builds a fresh session (a `reqwest::Client`, or a browser process with
/// the `headless` feature) that is gone by the time the call returns.
#[derive(Clone, Debug)]
pub struct PageClient {
    backend: Backend,
    user_agent: Option<String>,
}

impl Default for PageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PageClient {
    /// Creates a client that loads pages over plain HTTP.
    pub fn new() -> Self {
        Self {
            backend: Backend::Http,
            user_agent: None,
        }
    }

    /// Creates a client that renders pages in a headless Chrome instance.
    #[cfg(feature = "headless")]
    pub fn headless() -> Self {
        Self {
            backend: Backend::Browser,
            user_agent: None,
        }
    }

    /// Pins the user agent instead of rotating through the built-in pool.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| get_user_agent().to_string())
    }

    /// Loads `url` and parses it into a [`Document`].
    pub async fn acquire(&self, url: &str, opts: &AcquireOptions) -> Result<Document, Error> {
        let html = self.fetch_html(url, opts).await?;
        Ok(Document::parse(url, &html))
    }

    /// Loads `url` and returns the raw HTML.
    ///
    /// Unlike [`PageClient::acquire`], the result is `Send`, so callers can
    /// keep it across further awaits and parse it later.
    pub async fn fetch_html(&self, url: &str, opts: &AcquireOptions) -> Result<String, Error> {
        let parsed = parse_target(url)?;
        tracing::debug!("acquiring {} (timeout {:?})", parsed, opts.timeout);
        match self.backend {
            Backend::Http => self.fetch_http(parsed, opts).await,
            #[cfg(feature = "headless")]
            Backend::Browser => {
                let ua = self.user_agent();
                let opts = opts.clone();
                let target = parsed.to_string();
                tokio::task::spawn_blocking(move || crate::browser::fetch(&target, &ua, &opts))
                    .await
                    .map_err(|e| Error::Browser(format!("browser task failed: {}", e)))?
            }
        }
    }

    async fn fetch_http(&self, url: Url, opts: &AcquireOptions) -> Result<String, Error> {
        if let Some(selector) = &opts.wait_for {
            tracing::debug!("http backend cannot wait for '{}', loading as-is", selector);
        }
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent())
            .timeout(opts.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed(e.to_string())
            })?;
        let resp = client
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("upgrade-insecure-requests", "1")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await
            .map_err(|e| request_error(e, opts.timeout))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| request_error(e, opts.timeout))?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Page load failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

fn parse_target(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(Error::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            url, other
        ))),
    }
}

fn request_error(e: reqwest::Error, timeout: Duration) -> Error {
    if e.is_timeout() {
        tracing::error!("Page load timed out after {:?}", timeout);
        return Error::Timeout(timeout);
    }
    tracing::error!("Failed to load page: {}", e);
    Error::RequestFailed(e.to_string())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
