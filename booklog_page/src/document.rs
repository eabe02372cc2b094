//! Parsed, queryable page.

use scraper::html::Select;
use scraper::{Html, Selector};

/// A loaded page: the parsed HTML tree and the URL it came from.
///
/// One `Document` belongs to one request. It is built from the HTML the
/// acquisition backend returned, and dropped when the request is done.
/// `Document` is not `Send`, so it cannot be held across an `.await`.
pub struct Document {
    url: String,
    html: Html,
}

impl Document {
    /// Parses a full HTML document.
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(html),
        }
    }

    /// The URL the document was loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Iterates over elements matching `selector`, in document order.
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.html.select(selector)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("url", &self.url).finish()
    }
}
