//! Duplicate-prevention check run before every splice.

use lakekit_shared::FieldNames;

/// A record is already enriched if its text mentions the pricing key.
///
/// Evaluated per record on the freshly located span; never cache the answer
/// across records, since spans move as earlier records grow.
pub fn already_enriched(record_text: &str, fields: &FieldNames) -> bool {
    record_text.contains(fields.pricing.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_key_marks_enriched() {
        let fields = FieldNames::default();
        let enriched = "{\n  name: \"Lac Léman\",\n  permitRequired: \"ja\",\n  permitPrices: {\n    daily: \"CHF 25.00\"\n  }\n}";
        let plain = "{\n  name: \"Zürichsee\",\n  permitRequired: \"ja\"\n}";
        assert!(already_enriched(enriched, &fields));
        assert!(!already_enriched(plain, &fields));
    }

    #[test]
    fn follows_configured_key() {
        let fields = FieldNames {
            pricing: "pricing".into(),
            ..FieldNames::default()
        };
        assert!(already_enriched("{ name: \"A\", pricing: {} }", &fields));
        assert!(!already_enriched("{ name: \"A\", permitPrice: {} }", &fields));
    }
}
