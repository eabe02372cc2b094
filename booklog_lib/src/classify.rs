//! Search-result link extraction, classification, and selection.

use booklog_page::Document;
use scraper::Selector;
use url::Url;

use crate::rules::LinkRule;
use crate::scrape::ScrapeError;
use crate::types::{BookLink, RawLink, StoreType};

/// Ad and redirect wrappers that never point straight at a retailer.
const REJECTED_MARKERS: &[&str] = &["/aclk?", "/url?"];

/// Pulls result anchors off a search page.
///
/// Rules are tried in order; the first rule that yields any link decides
/// the result, later rules are not consulted.
pub fn extract_links(doc: &Document, rules: &[LinkRule]) -> Vec<RawLink> {
    for rule in rules {
        let links = links_for_rule(doc, rule);
        if !links.is_empty() {
            return links;
        }
    }
    Vec::new()
}

fn links_for_rule(doc: &Document, rule: &LinkRule) -> Vec<RawLink> {
    let Ok(anchor) = Selector::parse(&rule.anchor) else {
        tracing::warn!("skipping invalid anchor selector '{}'", rule.anchor);
        return Vec::new();
    };
    let title_sel = match &rule.title {
        Some(t) => match Selector::parse(t) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!("skipping rule with invalid title selector '{}': {}", t, e);
                return Vec::new();
            }
        },
        None => None,
    };

    let mut out = Vec::new();
    for el in doc.select(&anchor) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }
        let title = match &title_sel {
            Some(sel) => match el.select(sel).next() {
                Some(t) => collapse(&t.text().collect::<String>()),
                None => continue,
            },
            None => collapse(&el.text().collect::<String>()),
        };
        out.push(RawLink {
            url: href.to_string(),
            title,
        });
    }
    out
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps links that point at a known retailer and tags them with its store.
///
/// Drops non-HTTP(S) links, ad/redirect wrappers, and links whose host and
/// path match no entry in `domains`. Input order is preserved.
pub fn classify_links(raw: &[RawLink], domains: &[(String, StoreType)]) -> Vec<BookLink> {
    raw.iter()
        .filter_map(|link| classify(link, domains))
        .collect()
}

fn classify(link: &RawLink, domains: &[(String, StoreType)]) -> Option<BookLink> {
    let lower = link.url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return None;
    }
    if REJECTED_MARKERS.iter().any(|m| link.url.contains(m)) {
        return None;
    }
    let parsed = Url::parse(&link.url).ok()?;
    let host_path = format!("{}{}", parsed.host_str()?, parsed.path()).to_ascii_lowercase();
    let store_type = domains
        .iter()
        .find(|(needle, _)| host_path.contains(needle.as_str()))
        .map(|(_, store)| *store)?;
    Some(BookLink {
        url: link.url.clone(),
        title: link.title.clone(),
        store_type,
    })
}

/// Picks the link to follow.
///
/// Prefers the first link from `preference`; without one (or with no link
/// from that store) falls back to the first classified link. Only an empty
/// list is an error.
pub fn select_link(
    classified: Vec<BookLink>,
    preference: Option<StoreType>,
) -> Result<BookLink, ScrapeError> {
    if let Some(store) = preference {
        if let Some(link) = classified.iter().find(|l| l.store_type == store) {
            return Ok(link.clone());
        }
    }
    classified.into_iter().next().ok_or_else(|| {
        ScrapeError::NoUsableResult("no search result links to a known book store".into())
    })
}
