//! Retailer scraping: product pages and search-result link lookup.

use std::sync::Arc;
use std::time::Instant;

use booklog_page::{AcquireOptions, Document, PageClient};
use url::Url;

use crate::asin::asin_from_url;
use crate::assemble::assemble;
use crate::classify::{classify_links, extract_links, select_link};
use crate::config::ScrapeConfig;
use crate::events::{EventSink, ScrapeCtx};
use crate::extract::{extract_all_traced, ExtractionField};
use crate::rules::{
    product_fields, search_link_rules, store_domains, LinkRule, FIELD_ASIN,
    PRODUCT_READY_SELECTOR,
};
use crate::types::{BookLink, ProductRecord, StoreType};

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    /// The page could not be loaded within bounds.
    #[error("page acquisition failed: {0}")]
    Acquisition(#[from] booklog_page::Error),
    /// Loading worked but nothing admissible came out of it.
    #[error("no usable result: {0}")]
    NoUsableResult(String),
}

/// Scrapes product metadata and finds retailer links.
///
/// Holds only configuration and rule tables; every call acquires its own
/// page, so one client can serve concurrent requests.
pub struct ScrapeClient {
    pages: PageClient,
    config: ScrapeConfig,
    product_fields: Vec<ExtractionField>,
    link_rules: Vec<LinkRule>,
    domains: Vec<(String, StoreType)>,
    sink: Option<Arc<dyn EventSink>>,
}

impl Default for ScrapeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrapeClient {
    pub fn new() -> Self {
        Self::with_config(ScrapeConfig::default())
    }

    pub fn with_config(config: ScrapeConfig) -> Self {
        Self {
            pages: page_client(&config),
            config,
            product_fields: product_fields(),
            link_rules: search_link_rules(),
            domains: store_domains(),
            sink: None,
        }
    }

    /// Mirrors every scrape event into `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replaces the product field table.
    pub fn with_product_fields(mut self, fields: Vec<ExtractionField>) -> Self {
        self.product_fields = fields;
        self
    }

    /// Replaces the retailer domain table.
    pub fn with_store_domains(mut self, domains: Vec<(String, StoreType)>) -> Self {
        self.domains = domains;
        self
    }

    fn ctx(&self, op: &'static str) -> ScrapeCtx {
        ScrapeCtx::new(op).with_optional_sink(self.sink.clone())
    }

    fn acquire_options(&self, wait_for: Option<&str>) -> AcquireOptions {
        let opts = AcquireOptions::default().with_timeout(self.config.timeout);
        match wait_for {
            Some(sel) => opts.with_wait_for(sel),
            None => opts,
        }
    }

    /// Loads a product page and extracts its metadata.
    ///
    /// Fields the page does not carry come back as `"Not found"`; only a
    /// failed page load is an error.
    pub async fn scrape_product(&self, url: &str) -> Result<ProductRecord, ScrapeError> {
        let ctx = self.ctx("scrape_product");
        let started = Instant::now();
        ctx.info_kv("start", [("url", url.to_string())]);

        let opts = self.acquire_options(Some(PRODUCT_READY_SELECTOR));
        let html = match self.pages.fetch_html(url, &opts).await {
            Ok(html) => html,
            Err(e) => {
                ctx.warn_kv("acquisition_failed", [("error", e.to_string())]);
                return Err(e.into());
            }
        };

        let doc = Document::parse(url, &html);
        let record = extract_product(&ctx, &doc, &self.product_fields);
        ctx.info_kv(
            "done",
            [
                ("title", record.title.clone()),
                ("elapsed_ms", started.elapsed().as_millis().to_string()),
            ],
        );
        Ok(record)
    }

    /// Searches the web for `query` and returns the best retailer link.
    ///
    /// A link from `preference` wins when one exists; otherwise the first
    /// recognized retailer link is returned and a `degraded_selection`
    /// event is emitted. Fails only when no result links to a known store.
    pub async fn search_for_book_link(
        &self,
        query: &str,
        preference: Option<StoreType>,
    ) -> Result<BookLink, ScrapeError> {
        let ctx = self.ctx("search");
        let search_url = self.search_url(query, preference)?;
        ctx.info_kv(
            "start",
            [
                ("query", query.to_string()),
                ("url", search_url.clone()),
            ],
        );

        let opts = self.acquire_options(None);
        let html = match self.pages.fetch_html(&search_url, &opts).await {
            Ok(html) => html,
            Err(e) => {
                ctx.warn_kv("acquisition_failed", [("error", e.to_string())]);
                return Err(e.into());
            }
        };

        let raw = {
            let doc = Document::parse(search_url.as_str(), &html);
            extract_links(&doc, &self.link_rules)
        };
        let classified = classify_links(&raw, &self.domains);
        ctx.debug_kv(
            "links_classified",
            [
                ("raw", raw.len().to_string()),
                ("classified", classified.len().to_string()),
            ],
        );

        let link = match select_link(classified, preference) {
            Ok(link) => link,
            Err(e) => {
                ctx.warn_kv("no_usable_result", [("query", query.to_string())]);
                return Err(e);
            }
        };
        if let Some(wanted) = preference {
            if link.store_type != wanted {
                ctx.warn_kv(
                    "degraded_selection",
                    [
                        ("wanted", wanted.to_string()),
                        ("got", link.store_type.to_string()),
                    ],
                );
            }
        }
        ctx.info_kv(
            "done",
            [
                ("url", link.url.clone()),
                ("store", link.store_type.to_string()),
            ],
        );
        Ok(link)
    }

    /// Builds the search URL for `query`, restricted to the preferred store's
    /// site when there is one.
    pub fn search_url(
        &self,
        query: &str,
        preference: Option<StoreType>,
    ) -> Result<String, ScrapeError> {
        let mut url = Url::parse(&self.config.search_url).map_err(|e| {
            booklog_page::Error::InvalidUrl(format!("{}: {}", self.config.search_url, e))
        })?;
        let mut q = format!("{} book", query.trim());
        if let Some(store) = preference {
            q.push_str(" site:");
            q.push_str(store.site());
        }
        url.query_pairs_mut().append_pair("q", &q);
        Ok(url.to_string())
    }
}

/// Runs the product field table against `doc`.
///
/// The ASIN is read straight from the document URL when it carries a
/// `/dp/` or `/gp/product/` segment; the page is only consulted otherwise.
pub fn extract_product(ctx: &ScrapeCtx, doc: &Document, fields: &[ExtractionField]) -> ProductRecord {
    let url_asin = asin_from_url(doc.url());
    let page_fields = fields
        .iter()
        .filter(|f| !(url_asin.is_some() && f.name == FIELD_ASIN));
    let mut result = extract_all_traced(ctx, doc, page_fields);
    if let Some(asin) = url_asin {
        ctx.debug_kv("asin_from_url", [("asin", asin.clone())]);
        result.insert(FIELD_ASIN, asin);
    }
    assemble(&result, fields, doc.url())
}

fn page_client(config: &ScrapeConfig) -> PageClient {
    let client = if config.headless {
        headless_client()
    } else {
        PageClient::new()
    };
    match &config.user_agent {
        Some(ua) => client.with_user_agent(ua),
        None => client,
    }
}

#[cfg(feature = "headless")]
fn headless_client() -> PageClient {
    PageClient::headless()
}

#[cfg(not(feature = "headless"))]
fn headless_client() -> PageClient {
    tracing::warn!("headless rendering requested but not compiled in, using plain HTTP");
    PageClient::new()
}
