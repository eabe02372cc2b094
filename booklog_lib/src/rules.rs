//! Site rule tables.
//!
//! Retailer markup drifts between product categories and regions, so each
//! field lists every selector that has been seen to carry it, newest first.

use crate::extract::{ExtractionField, SelectorRule};
use crate::types::StoreType;

pub const FIELD_ASIN: &str = "asin";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_AUTHOR: &str = "author";
pub const FIELD_YEAR: &str = "yearPublished";
pub const FIELD_PAGES: &str = "pageLength";
pub const FIELD_DESCRIPTION: &str = "description";

/// First four-digit run, e.g. the year in "March 3, 2020".
pub const YEAR_PATTERN: &str = r"\b(\d{4})\b";
/// Digits in front of "pages", e.g. "1,024" in "1,024 pages".
pub const PAGES_PATTERN: &str = r"(\d[\d,]*)\s*pages";
const ASIN_PATTERN: &str = r"\b([A-Z0-9]{10})\b";
const ISBN10_PATTERN: &str = r"\b(\d{9}[\dX])\b";

/// Only the product's own containers; carousels tag every tile with `data-asin`.
const ASIN_CONTAINERS: &str = "#dp[data-asin], #averageCustomerReviews[data-asin]";

const DETAIL_BULLETS: &str = "#detailBullets_feature_div li, #detail_bullets_id li, #productDetailsTable li";

/// Selector whose presence marks a rendered product page.
pub const PRODUCT_READY_SELECTOR: &str = "#productTitle";

/// Field table for Amazon-style product pages.
pub fn product_fields() -> Vec<ExtractionField> {
    vec![
        ExtractionField::new(FIELD_ASIN)
            .rule(SelectorRule::attr("input#ASIN", "value"))
            .rule(SelectorRule::attr(ASIN_CONTAINERS, "data-asin"))
            .rule(SelectorRule::labeled(DETAIL_BULLETS, "ASIN").with_pattern(ASIN_PATTERN))
            .rule(SelectorRule::labeled(DETAIL_BULLETS, "ISBN-10").with_pattern(ISBN10_PATTERN)),
        ExtractionField::new(FIELD_TITLE)
            .rule(SelectorRule::text("#productTitle"))
            .rule(SelectorRule::text("#ebooksProductTitle"))
            .rule(SelectorRule::text("#title span")),
        ExtractionField::new(FIELD_AUTHOR)
            .rule(SelectorRule::joined(
                "#bylineInfo .author a.contributorNameID",
                ", ",
            ))
            .rule(SelectorRule::joined("#bylineInfo .author > a", ", "))
            .rule(SelectorRule::joined(".author a", ", ")),
        ExtractionField::new(FIELD_YEAR)
            .rule(
                SelectorRule::text(
                    "#rpi-attribute-book_details-publication_date .rpi-attribute-value span",
                )
                .with_pattern(YEAR_PATTERN),
            )
            .rule(SelectorRule::labeled(DETAIL_BULLETS, "Publication date").with_pattern(YEAR_PATTERN))
            .rule(SelectorRule::labeled(DETAIL_BULLETS, "Publisher").with_pattern(YEAR_PATTERN)),
        ExtractionField::new(FIELD_PAGES)
            .rule(
                SelectorRule::text(
                    "#rpi-attribute-book_details-ebook_pages .rpi-attribute-value span",
                )
                .with_pattern(PAGES_PATTERN),
            )
            .rule(
                SelectorRule::text(
                    "#rpi-attribute-book_details-fiona_pages .rpi-attribute-value span",
                )
                .with_pattern(PAGES_PATTERN),
            )
            .rule(SelectorRule::labeled(DETAIL_BULLETS, "Print length").with_pattern(PAGES_PATTERN))
            .rule(SelectorRule::labeled(DETAIL_BULLETS, "pages").with_pattern(PAGES_PATTERN)),
        ExtractionField::new(FIELD_DESCRIPTION)
            .rule(SelectorRule::text(
                "#bookDescription_feature_div .a-expander-content",
            ))
            .rule(SelectorRule::text("#bookDescription_feature_div"))
            .rule(SelectorRule::text("#productDescription"))
            .rule(SelectorRule::attr("meta[name=\"description\"]", "content")),
    ]
}

/// How to pull result anchors off a search-results page.
#[derive(Clone, Debug)]
pub struct LinkRule {
    /// Selector for the result anchors; the URL comes from `href`.
    pub anchor: String,
    /// Selector for the title inside the anchor. `None` uses the anchor's
    /// own text; when set, anchors without a title are skipped.
    pub title: Option<String>,
}

impl LinkRule {
    pub fn new(anchor: &str, title: Option<&str>) -> Self {
        Self {
            anchor: anchor.to_string(),
            title: title.map(str::to_string),
        }
    }
}

/// Anchor rules for search-results pages, tried in order.
pub fn search_link_rules() -> Vec<LinkRule> {
    vec![
        LinkRule::new("#search a[href]", Some("h3")),
        LinkRule::new("a.result__a[href]", None),
        LinkRule::new("a[href]", Some("h3")),
    ]
}

/// Host/path substrings that identify each retailer. First match wins.
pub fn store_domains() -> Vec<(String, StoreType)> {
    vec![
        ("amazon.".to_string(), StoreType::Amazon),
        ("goodreads.com".to_string(), StoreType::Goodreads),
        ("barnesandnoble.com".to_string(), StoreType::BarnesNoble),
        ("bookshop.org".to_string(), StoreType::Bookshop),
    ]
}
