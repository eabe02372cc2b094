//! Maps extracted field values onto a [`ProductRecord`].

use crate::extract::{ExtractionField, ExtractionResult, NOT_FOUND};
use crate::rules::{FIELD_ASIN, FIELD_AUTHOR, FIELD_DESCRIPTION, FIELD_PAGES, FIELD_TITLE, FIELD_YEAR};
use crate::types::ProductRecord;

/// Builds the output record. Absent values take the sentinel of the field
/// that would have produced them, `"Not found"` for unknown fields.
pub fn assemble(result: &ExtractionResult, fields: &[ExtractionField], source_url: &str) -> ProductRecord {
    let value = |name: &str| -> String {
        match result.get(name) {
            Some(v) => v.to_string(),
            None => fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.sentinel.clone())
                .unwrap_or_else(|| NOT_FOUND.to_string()),
        }
    };

    ProductRecord {
        asin: value(FIELD_ASIN),
        title: value(FIELD_TITLE),
        author: value(FIELD_AUTHOR),
        year_published: value(FIELD_YEAR),
        page_length: value(FIELD_PAGES),
        description: value(FIELD_DESCRIPTION),
        source_url: source_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::product_fields;

    #[test]
    fn fills_missing_fields_with_sentinel() {
        let mut result = ExtractionResult::default();
        result.insert(FIELD_TITLE, "Example Book".to_string());
        let record = assemble(&result, &product_fields(), "https://www.amazon.com/dp/B08ABC1234");
        assert_eq!(record.title, "Example Book");
        assert_eq!(record.author, NOT_FOUND);
        assert_eq!(record.asin, NOT_FOUND);
        assert_eq!(record.source_url, "https://www.amazon.com/dp/B08ABC1234");
    }

    #[test]
    fn uses_field_specific_sentinel() {
        let fields = vec![ExtractionField::new(FIELD_DESCRIPTION).with_sentinel("")];
        let record = assemble(&ExtractionResult::default(), &fields, "u");
        assert_eq!(record.description, "");
        assert_eq!(record.title, NOT_FOUND);
    }

    #[test]
    fn source_url_is_verbatim() {
        let url = "https://www.amazon.com/Some-Book/dp/B08ABC1234/ref=sr_1_1?keywords=x";
        let record = assemble(&ExtractionResult::default(), &[], url);
        assert_eq!(record.source_url, url);
    }
}
