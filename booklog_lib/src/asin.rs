//! Product identifiers embedded in retailer URLs.

use url::Url;

const ASIN_MARKERS: &[&str] = &["/dp/", "/gp/product/"];

/// Returns the identifier that follows `/dp/` or `/gp/product/` in the path
/// of `url`.
///
/// The identifier runs up to the next `/`. Query strings and fragments are
/// never searched. Returns `None` when `url` does not parse, neither marker
/// is in the path, or nothing follows it.
pub fn asin_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path();
    for marker in ASIN_MARKERS {
        if let Some(idx) = path.find(marker) {
            let rest = &path[idx + marker.len()..];
            let id = rest.split('/').next().unwrap_or_default();
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
    }
    None
}
