use url::Url;

use crate::error::BooklogError;
use crate::types::StoreType;

pub const MAX_QUERY_LENGTH: usize = 200;
pub const MAX_URL_LENGTH: usize = 2048;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, BooklogError> {
    if input.len() > max_len {
        return Err(BooklogError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(BooklogError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a book search query: enforce length, strip control chars, trim.
pub fn validate_query(input: &str) -> Result<String, BooklogError> {
    sanitize_text(input, MAX_QUERY_LENGTH)
}

/// Validate a product page URL: absolute, http or https, with a host.
pub fn validate_url(input: &str) -> Result<String, BooklogError> {
    let trimmed = sanitize_text(input, MAX_URL_LENGTH)?;
    let parsed = Url::parse(&trimmed)
        .map_err(|e| BooklogError::InvalidInput(format!("invalid URL '{}': {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(BooklogError::InvalidInput(format!(
                "unsupported URL scheme '{}', expected http or https",
                other
            )))
        }
    }
    if parsed.host_str().is_none() {
        return Err(BooklogError::InvalidInput(format!(
            "URL '{}' has no host",
            trimmed
        )));
    }
    Ok(trimmed)
}

/// Validate a store name: case-insensitive, supports `bn` and `barnes-noble`.
pub fn validate_store(input: &str) -> Result<StoreType, BooklogError> {
    input.parse::<StoreType>().map_err(|_| {
        BooklogError::InvalidInput(format!(
            "unknown store '{}'. Valid stores: amazon, goodreads, barnesnoble, bookshop",
            input
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Query validation --

    #[test]
    fn query_trims_and_strips_control_chars() {
        assert_eq!(validate_query("  Dune\t\n").unwrap(), "Dune");
        assert_eq!(validate_query("The\x07 Hobbit").unwrap(), "The Hobbit");
    }

    #[test]
    fn query_empty() {
        assert!(validate_query("").is_err());
        assert!(validate_query("   \n").is_err());
    }

    #[test]
    fn query_at_limit() {
        let q = "a".repeat(MAX_QUERY_LENGTH);
        assert_eq!(validate_query(&q).unwrap().len(), MAX_QUERY_LENGTH);
    }

    #[test]
    fn query_too_long() {
        let q = "a".repeat(MAX_QUERY_LENGTH + 1);
        assert!(validate_query(&q).is_err());
    }

    #[test]
    fn query_keeps_unicode() {
        assert_eq!(validate_query("Cien años de soledad").unwrap(), "Cien años de soledad");
    }

    // -- URL validation --

    #[test]
    fn url_https() {
        let u = "https://www.amazon.com/dp/0441172717";
        assert_eq!(validate_url(u).unwrap(), u);
    }

    #[test]
    fn url_trimmed() {
        assert_eq!(
            validate_url(" http://example.com/book ").unwrap(),
            "http://example.com/book"
        );
    }

    #[test]
    fn url_relative() {
        assert!(validate_url("/dp/0441172717").is_err());
    }

    #[test]
    fn url_bad_scheme() {
        assert!(validate_url("ftp://example.com/book").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
    }

    // -- Store validation --

    #[test]
    fn store_names() {
        assert_eq!(validate_store("Amazon").unwrap(), StoreType::Amazon);
        assert_eq!(validate_store("bn").unwrap(), StoreType::BarnesNoble);
        assert_eq!(validate_store("bookshop").unwrap(), StoreType::Bookshop);
    }

    #[test]
    fn store_unknown() {
        let err = validate_store("kobo").unwrap_err();
        assert!(err.to_string().contains("kobo"));
    }
}
