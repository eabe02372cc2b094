//! Headless Chrome backend.

use std::ffi::OsStr;

use headless_chrome::{Browser, LaunchOptions};

use crate::{AcquireOptions, Error};

/// Renders `url` in a fresh browser and returns the page HTML.
///
/// Blocking. The browser process is owned by this call: dropping `browser`
/// on any return path shuts it down.
pub(crate) fn fetch(url: &str, user_agent: &str, opts: &AcquireOptions) -> Result<String, Error> {
    let ua_arg = format!("--user-agent={}", user_agent);
    let args = vec![
        OsStr::new("--disable-blink-features=AutomationControlled"),
        OsStr::new("--disable-dev-shm-usage"),
        OsStr::new(&ua_arg),
    ];

    let browser = Browser::new(LaunchOptions {
        headless: true,
        sandbox: false,
        window_size: Some((1920, 1080)),
        idle_browser_timeout: opts.timeout,
        args,
        ..Default::default()
    })
    .map_err(browser_error)?;
    tracing::debug!("browser session opened for {}", url);

    let result = render(&browser, url, opts);
    drop(browser);
    tracing::debug!("browser session released for {}", url);
    result
}

fn render(browser: &Browser, url: &str, opts: &AcquireOptions) -> Result<String, Error> {
    let tab = browser.new_tab().map_err(browser_error)?;
    tab.set_default_timeout(opts.timeout);
    tab.navigate_to(url)
        .and_then(|t| t.wait_until_navigated())
        .map_err(|e| navigation_error(e, opts))?;

    if let Some(selector) = &opts.wait_for {
        if let Err(e) = tab.wait_for_element_with_custom_timeout(selector, opts.timeout) {
            // Missing markers fall through to the extractor's sentinels.
            tracing::warn!("wait for '{}' gave up: {}", selector, e);
        }
    }

    tab.get_content().map_err(browser_error)
}

fn navigation_error(e: impl std::fmt::Display, opts: &AcquireOptions) -> Error {
    let msg = e.to_string();
    let lower = msg.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        return Error::Timeout(opts.timeout);
    }
    Error::Browser(msg)
}

fn browser_error(e: impl std::fmt::Display) -> Error {
    Error::Browser(e.to_string())
}
