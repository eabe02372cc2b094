//! Selector-chain extraction.
//!
//! A field is described by an ordered list of [`SelectorRule`]s. Rules are
//! tried in declaration order and the first one that yields a non-empty,
//! post-processed value decides the field. When every rule comes up empty
//! the field resolves to its sentinel. A missing field is never an error.

use booklog_page::Document;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::events::ScrapeCtx;

/// Placeholder returned for fields no rule could resolve.
pub const NOT_FOUND: &str = "Not found";

/// How a rule turns its matched nodes into a raw string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extract {
    /// Text of the first matched node with non-empty text.
    Text,
    /// First non-empty value of the named attribute among matched nodes.
    Attr(String),
    /// Distinct non-empty texts of all matched nodes, joined by the separator.
    JoinedText(String),
    /// Text of the first matched node whose text contains the label.
    Labeled(String),
}

/// One strategy for resolving a field.
#[derive(Clone, Debug)]
pub struct SelectorRule {
    pub selector: String,
    pub extract: Extract,
    /// Regex applied to the extracted text. Group 1 is used when the pattern
    /// has one, the whole match otherwise. No match discards the rule.
    pub postprocess: Option<String>,
}

impl SelectorRule {
    pub fn text(selector: &str) -> Self {
        Self::new(selector, Extract::Text)
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Self::new(selector, Extract::Attr(attr.to_string()))
    }

    pub fn joined(selector: &str, separator: &str) -> Self {
        Self::new(selector, Extract::JoinedText(separator.to_string()))
    }

    pub fn labeled(selector: &str, label: &str) -> Self {
        Self::new(selector, Extract::Labeled(label.to_string()))
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.postprocess = Some(pattern.to_string());
        self
    }

    fn new(selector: &str, extract: Extract) -> Self {
        Self {
            selector: selector.to_string(),
            extract,
            postprocess: None,
        }
    }
}

/// A named attribute to recover from a page.
#[derive(Clone, Debug)]
pub struct ExtractionField {
    pub name: String,
    pub rules: Vec<SelectorRule>,
    pub sentinel: String,
}

impl ExtractionField {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rules: Vec::new(),
            sentinel: NOT_FOUND.to_string(),
        }
    }

    pub fn rule(mut self, rule: SelectorRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_sentinel(mut self, sentinel: &str) -> Self {
        self.sentinel = sentinel.to_string();
        self
    }
}

/// Field name to resolved value, in the order the fields were evaluated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    values: Vec<(String, String)>,
}

impl ExtractionResult {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `name` to `value`, replacing any earlier value.
    pub fn insert(&mut self, name: &str, value: String) {
        match self.values.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Outcome of resolving one field, including which rule won.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub value: String,
    /// Index of the winning rule, `None` when the sentinel was used.
    pub rule: Option<usize>,
}

/// Resolves `field` against `doc`, returning the value or the sentinel.
pub fn extract_field(doc: &Document, field: &ExtractionField) -> String {
    resolve_field(doc, field).value
}

/// Like [`extract_field`], but also reports which rule produced the value.
pub fn resolve_field(doc: &Document, field: &ExtractionField) -> Resolution {
    for (idx, rule) in field.rules.iter().enumerate() {
        if let Some(value) = apply_rule(doc, rule) {
            return Resolution {
                value,
                rule: Some(idx),
            };
        }
    }
    Resolution {
        value: field.sentinel.clone(),
        rule: None,
    }
}

/// Resolves every field independently.
pub fn extract_all<'a, I>(doc: &Document, fields: I) -> ExtractionResult
where
    I: IntoIterator<Item = &'a ExtractionField>,
{
    let mut result = ExtractionResult::default();
    for field in fields {
        result.insert(&field.name, extract_field(doc, field));
    }
    result
}

/// [`extract_all`] that reports each field's outcome through `ctx`.
pub fn extract_all_traced<'a, I>(ctx: &ScrapeCtx, doc: &Document, fields: I) -> ExtractionResult
where
    I: IntoIterator<Item = &'a ExtractionField>,
{
    let mut result = ExtractionResult::default();
    for field in fields {
        let resolution = resolve_field(doc, field);
        match resolution.rule {
            Some(idx) => ctx.debug_kv(
                "field_resolved",
                [
                    ("field", field.name.clone()),
                    ("rule", idx.to_string()),
                    ("selector", field.rules[idx].selector.clone()),
                ],
            ),
            None => ctx.info_kv(
                "field_missing",
                [
                    ("field", field.name.clone()),
                    ("rules_tried", field.rules.len().to_string()),
                ],
            ),
        }
        result.insert(&field.name, resolution.value);
    }
    result
}

fn apply_rule(doc: &Document, rule: &SelectorRule) -> Option<String> {
    let selector = match Selector::parse(&rule.selector) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("skipping invalid selector '{}': {}", rule.selector, e);
            return None;
        }
    };

    let nodes = doc.select(&selector);
    let raw = match &rule.extract {
        Extract::Text => nodes.map(node_text).find(|t| !t.is_empty()),
        Extract::Attr(name) => nodes
            .filter_map(|n| n.value().attr(name))
            .map(normalize)
            .find(|v| !v.is_empty()),
        Extract::JoinedText(sep) => {
            let mut parts: Vec<String> = Vec::new();
            for text in nodes.map(node_text) {
                if !text.is_empty() && !parts.contains(&text) {
                    parts.push(text);
                }
            }
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(sep))
            }
        }
        Extract::Labeled(label) => nodes.map(node_text).find(|t| t.contains(label.as_str())),
    }?;

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match &rule.postprocess {
        None => Some(raw.to_string()),
        Some(pattern) => first_match(pattern, raw),
    }
}

fn first_match(pattern: &str, haystack: &str) -> Option<String> {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("skipping invalid pattern '{}': {}", pattern, e);
            return None;
        }
    };
    let caps = re.captures(haystack)?;
    let m = caps.get(1).or_else(|| caps.get(0))?;
    let value = m.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn node_text(node: ElementRef<'_>) -> String {
    normalize(&node.text().collect::<String>())
}

/// Drops bidi marks and collapses whitespace runs to single spaces.
fn normalize(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if matches!(ch, '\u{200e}' | '\u{200f}' | '\u{feff}') {
            continue;
        }
        if ch.is_whitespace() {
            if !in_ws && !buf.is_empty() {
                buf.push(' ');
            }
            in_ws = true;
        } else {
            buf.push(ch);
            in_ws = false;
        }
    }
    buf.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;

    fn doc(body: &str) -> Document {
        Document::parse(
            "https://www.example.com/book",
            &format!("<html><body>{}</body></html>", body),
        )
    }

    fn title_field() -> ExtractionField {
        ExtractionField::new("title")
            .rule(SelectorRule::text("#productTitle"))
            .rule(SelectorRule::text("#ebooksProductTitle"))
    }

    #[test]
    fn first_rule_resolves() {
        let d = doc(r#"<span id="productTitle">  Example Book </span>"#);
        assert_eq!(extract_field(&d, &title_field()), "Example Book");
    }

    #[test]
    fn missing_field_returns_sentinel() {
        let d = doc(r#"<h1>Something else</h1>"#);
        assert_eq!(extract_field(&d, &title_field()), "Not found");
    }

    #[test]
    fn custom_sentinel() {
        let d = doc("");
        let field = title_field().with_sentinel("n/a");
        assert_eq!(extract_field(&d, &field), "n/a");
    }

    #[test]
    fn field_without_rules_returns_sentinel() {
        let d = doc(r#"<span id="productTitle">x</span>"#);
        assert_eq!(extract_field(&d, &ExtractionField::new("empty")), NOT_FOUND);
    }

    #[test]
    fn earlier_rule_wins_over_later_match() {
        let d = doc(
            r#"<ul>
                 <li>Publication date : March 3, 2020</li>
                 <li>Publisher : Ace; Reprint edition (August 2, 2005)</li>
               </ul>"#,
        );
        let field = ExtractionField::new("yearPublished")
            .rule(SelectorRule::labeled("li", "Publication date").with_pattern(r"\b\d{4}\b"))
            .rule(SelectorRule::labeled("li", "Publisher").with_pattern(r"\b\d{4}\b"));
        let res = resolve_field(&d, &field);
        assert_eq!(res.value, "2020");
        assert_eq!(res.rule, Some(0));
    }

    #[test]
    fn falls_through_when_first_selector_absent() {
        let d = doc(r#"<span id="ebooksProductTitle">Kindle Title</span>"#);
        let res = resolve_field(&d, &title_field());
        assert_eq!(res.value, "Kindle Title");
        assert_eq!(res.rule, Some(1));
    }

    #[test]
    fn empty_match_falls_through() {
        let d = doc(
            r#"<span id="productTitle">   </span><span id="ebooksProductTitle">Kindle</span>"#,
        );
        assert_eq!(extract_field(&d, &title_field()), "Kindle");
    }

    #[test]
    fn pattern_miss_discards_rule() {
        let d = doc(r#"<div id="pages">unknown length</div><div id="alt">352 pages</div>"#);
        let field = ExtractionField::new("pageLength")
            .rule(SelectorRule::text("#pages").with_pattern(r"(\d[\d,]*)\s*pages"))
            .rule(SelectorRule::text("#alt").with_pattern(r"(\d[\d,]*)\s*pages"));
        let res = resolve_field(&d, &field);
        assert_eq!(res.value, "352");
        assert_eq!(res.rule, Some(1));
    }

    #[test]
    fn pattern_without_group_uses_whole_match() {
        assert_eq!(
            first_match(r"\b\d{4}\b", "Publisher : Ace (August 2, 2005)"),
            Some("2005".to_string())
        );
    }

    #[test]
    fn attr_extract_skips_empty_values() {
        let d = doc(r#"<div data-asin=""></div><div data-asin="B000FC0SIM"></div>"#);
        let field =
            ExtractionField::new("asin").rule(SelectorRule::attr("[data-asin]", "data-asin"));
        assert_eq!(extract_field(&d, &field), "B000FC0SIM");
    }

    #[test]
    fn joined_text_dedupes_and_joins() {
        let d = doc(
            r#"<span class="author"><a>Neil Gaiman</a></span>
               <span class="author"><a>Terry Pratchett</a></span>
               <span class="author"><a>Neil Gaiman</a></span>"#,
        );
        let field = ExtractionField::new("author").rule(SelectorRule::joined(".author a", ", "));
        assert_eq!(extract_field(&d, &field), "Neil Gaiman, Terry Pratchett");
    }

    #[test]
    fn labeled_extract_strips_bidi_marks() {
        let d = doc("<ul><li>Print length \u{200f} : \u{200e} 412 pages</li></ul>");
        let field = ExtractionField::new("pageLength")
            .rule(SelectorRule::labeled("li", "Print length").with_pattern(r"(\d[\d,]*)\s*pages"));
        assert_eq!(extract_field(&d, &field), "412");
    }

    #[test]
    fn invalid_selector_is_skipped() {
        let d = doc(r#"<span id="productTitle">Found</span>"#);
        let field = ExtractionField::new("title")
            .rule(SelectorRule::text("##broken["))
            .rule(SelectorRule::text("#productTitle"));
        assert_eq!(extract_field(&d, &field), "Found");
    }

    #[test]
    fn extract_all_keeps_field_order() {
        let d = doc(r#"<span id="productTitle">T</span>"#);
        let fields = vec![
            ExtractionField::new("author").rule(SelectorRule::text(".author")),
            title_field(),
        ];
        let result = extract_all(&d, &fields);
        let names: Vec<&str> = result.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["author", "title"]);
        assert_eq!(result.get("author"), Some(NOT_FOUND));
        assert_eq!(result.get("title"), Some("T"));
    }

    #[test]
    fn traced_extraction_reports_outcomes() {
        let d = doc(r#"<span id="productTitle">T</span>"#);
        let sink = RecordingSink::new();
        let ctx = ScrapeCtx::new("scrape_product").with_sink(sink.clone());
        let fields = vec![
            title_field(),
            ExtractionField::new("author").rule(SelectorRule::text(".author")),
        ];
        let result = extract_all_traced(&ctx, &d, &fields);
        assert_eq!(result, extract_all(&d, &fields));

        let resolved = sink.of_kind("field_resolved");
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].detail("field"), Some("title"));
        assert_eq!(resolved[0].detail("rule"), Some("0"));
        let missing = sink.of_kind("field_missing");
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].detail("field"), Some("author"));
    }

    #[test]
    fn insert_replaces_existing_value() {
        let mut result = ExtractionResult::default();
        result.insert("asin", NOT_FOUND.to_string());
        result.insert("asin", "B08ABC1234".to_string());
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("asin"), Some("B08ABC1234"));
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  a \n\t b  "), "a b");
    }
}
