//! Reply normalizer: turns the model's free-form text into an [`ExtractionResponse`].
//!
//! The model is told to answer with a single `{"results": [...]}` object, but
//! replies routinely arrive wrapped in prose or code fences. The region from the
//! first `{` to the last `}` is taken as the payload; fields inside it are
//! coerced rather than validated, so a sloppy entry still yields a record.

use serde_json::Value;
use tracing::debug;

use crate::error::RelayError;
use crate::types::{ExtractionKind, ExtractionResponse, ExtractionResult};

/// Parse a raw model reply into typed results.
///
/// Fails with [`RelayError::ParseFailure`] when the text holds no brace-delimited
/// region, and with [`RelayError::MalformedPayload`] when that region is not
/// valid JSON. A missing or non-array `results` field is an empty response.
pub fn normalize_reply(raw: &str) -> Result<ExtractionResponse, RelayError> {
    let region = locate_json_region(raw).ok_or(RelayError::ParseFailure)?;
    let payload: Value = serde_json::from_str(region)?;

    let results = match payload.get("results") {
        Some(Value::Array(entries)) => entries.iter().map(coerce_entry).collect(),
        _ => Vec::new(),
    };

    debug!(count = results.len(), "Normalized model reply");
    Ok(ExtractionResponse { results })
}

/// Slice from the first `{` through the last `}` inclusive.
///
/// Greedy on purpose: two sibling objects produce one span that fails to parse.
pub fn locate_json_region(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Coerce one element of the `results` array into a record.
///
/// Non-object elements are kept and read as if every field were absent.
pub fn coerce_entry(entry: &Value) -> ExtractionResult {
    let kind = ExtractionKind::from_tag(entry.get("type").and_then(Value::as_str));
    let value = entry.get("value").map(coerce_text).unwrap_or_default();
    let uncertain = entry.get("uncertain").is_some_and(is_truthy);

    ExtractionResult {
        kind,
        value,
        uncertain,
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Loose truthiness: `false`, `null`, `0` and `""` are false, everything else is true.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_results_round_trip() {
        let response = normalize_reply(r#"{"results": []}"#).unwrap();
        assert!(response.is_empty());
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"results": []}));
    }

    #[test]
    fn extracts_record_from_surrounding_prose() {
        let raw = concat!(
            "Sure! Here is what I found:\n```json\n",
            r#"{"results":[{"type":"reg","value":"AB12 CDE","uncertain":false}]}"#,
            "\n```\nLet me know if you need anything else."
        );
        let response = normalize_reply(raw).unwrap();
        assert_eq!(
            response.results,
            vec![ExtractionResult::new(ExtractionKind::Registration, "AB12 CDE", false)]
        );
    }

    #[test]
    fn vin_without_uncertain_defaults_to_false() {
        let raw = r#"{"results":[{"type":"vin","value":"1HGCM82633A004352"}]}"#;
        let response = normalize_reply(raw).unwrap();
        assert_eq!(response.results[0].kind, ExtractionKind::Vin);
        assert_eq!(response.results[0].value, "1HGCM82633A004352");
        assert!(!response.results[0].uncertain);
    }

    #[test]
    fn unknown_type_becomes_registration() {
        let raw = r#"{"results":[{"type":"unknown","value":"X1","uncertain":true}]}"#;
        let response = normalize_reply(raw).unwrap();
        assert_eq!(response.results[0].kind, ExtractionKind::Registration);
        assert!(response.results[0].uncertain);
    }

    #[test]
    fn no_braces_is_parse_failure() {
        let err = normalize_reply("I could not see any vehicles in this image.").unwrap_err();
        assert!(matches!(err, RelayError::ParseFailure));

        let err = normalize_reply("").unwrap_err();
        assert!(matches!(err, RelayError::ParseFailure));
    }

    #[test]
    fn reversed_braces_is_parse_failure() {
        let err = normalize_reply("} nothing here {").unwrap_err();
        assert!(matches!(err, RelayError::ParseFailure));
    }

    #[test]
    fn invalid_json_between_braces_is_malformed() {
        let err = normalize_reply("{results: [oops]}").unwrap_err();
        assert!(matches!(err, RelayError::MalformedPayload(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn sibling_objects_are_not_split() {
        let raw = r#"{"results":[]} and also {"results":[]}"#;
        let err = normalize_reply(raw).unwrap_err();
        assert!(matches!(err, RelayError::MalformedPayload(_)));
    }

    #[test]
    fn missing_or_wrong_typed_results_is_empty() {
        assert!(normalize_reply(r#"{"plates": ["AB12 CDE"]}"#).unwrap().is_empty());
        assert!(normalize_reply(r#"{"results": "none"}"#).unwrap().is_empty());
        assert!(normalize_reply(r#"{"results": null}"#).unwrap().is_empty());
    }

    #[test]
    fn preserves_order_and_cardinality() {
        let raw = r#"{"results":[
            {"type":"reg","value":"AB12 CDE"},
            {"type":"vin","value":"1HGCM82633A004352"},
            {"type":"reg"},
            {"type":"reg","value":"AB12 CDE"}
        ]}"#;
        let response = normalize_reply(raw).unwrap();
        let values: Vec<_> = response.results.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["AB12 CDE", "1HGCM82633A004352", "", "AB12 CDE"]);
    }

    #[test]
    fn uncertain_uses_truthiness() {
        let cases = [
            (json!(true), true),
            (json!(false), false),
            (json!(null), false),
            (json!(0), false),
            (json!(1), true),
            (json!(""), false),
            (json!("false"), true),
            (json!([]), true),
            (json!({}), true),
        ];
        for (flag, expected) in cases {
            let entry = json!({"type": "reg", "value": "A1", "uncertain": flag});
            assert_eq!(coerce_entry(&entry).uncertain, expected, "flag {flag}");
        }
    }

    #[test]
    fn value_coercion_is_bounded() {
        assert_eq!(coerce_entry(&json!({"value": 123})).value, "123");
        assert_eq!(coerce_entry(&json!({"value": null})).value, "");
        assert_eq!(coerce_entry(&json!({"value": ["AB12"]})).value, "");
        assert_eq!(coerce_entry(&json!({})).value, "");
    }

    #[test]
    fn non_object_entries_are_kept() {
        let response = normalize_reply(r#"{"results":["AB12 CDE", 7]}"#).unwrap();
        assert_eq!(response.len(), 2);
        assert!(response
            .results
            .iter()
            .all(|r| r.kind == ExtractionKind::Registration && r.value.is_empty() && !r.uncertain));
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let raw = r#"prefix {"results":[{"type":"vin","value":"1HGCM82633A004352","uncertain":1}]} suffix"#;
        assert_eq!(normalize_reply(raw).unwrap(), normalize_reply(raw).unwrap());
    }

    #[test]
    fn locate_region_spans_first_to_last_brace() {
        assert_eq!(locate_json_region("a {x} b {y} c"), Some("{x} b {y}"));
        assert_eq!(locate_json_region("{"), None);
        assert_eq!(locate_json_region("}"), None);
    }
}
