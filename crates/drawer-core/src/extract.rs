//! Extraction normalizer: turns raw model output into a validated
//! [`ExtractedDocument`].
//!
//! The model response is an untrusted external payload. The contract is
//! best-effort normalization: locate the JSON object, parse it, then
//! coerce and default every field independently. A bad field never fails
//! the record; only the complete absence of parseable JSON does.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, ExtractedDocument, TransactionType};

/// `YYYY-MM-DD`, no slack.
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Locate the first top-level `{...}` span in free text.
///
/// Mirrors a greedy first-brace-to-last-brace match, which tolerates
/// prose or markdown fences around the object.
pub fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Normalize raw model output into a fully validated extraction record.
///
/// `today` substitutes for missing or malformed document dates; it is a
/// parameter so normalization stays deterministic under test.
///
/// # Errors
///
/// - [`Error::ExtractionFormat`] when the text contains no `{...}` span.
/// - [`Error::ExtractionParse`] when the span is not valid JSON.
pub fn normalize(model_output: &str, today: NaiveDate) -> Result<ExtractedDocument> {
    let span = json_span(model_output).ok_or(Error::ExtractionFormat)?;

    let raw: JsonValue =
        serde_json::from_str(span).map_err(|e| Error::ExtractionParse(e.to_string()))?;

    let merchant = coerce_merchant(raw.get("merchant"));
    let mut amount = coerce_amount(raw.get("amount"));
    let category = coerce_category(raw.get("category"));
    let transaction_type = coerce_transaction_type(raw.get("transaction_type"));
    let date = coerce_date(raw.get("date")).unwrap_or(today);
    let due_date = coerce_date(raw.get("due_date"));
    let summary = coerce_string(raw.get("summary"));
    let raw_text = coerce_string(raw.get("raw_text"));

    // Records are informational; zero the amount so they never skew totals.
    if transaction_type == TransactionType::Record {
        amount = Decimal::ZERO;
    }

    debug!(
        merchant = %merchant,
        category = %category,
        transaction_type = %transaction_type,
        "normalized extraction record"
    );

    Ok(ExtractedDocument {
        merchant,
        amount,
        category,
        transaction_type,
        date,
        due_date,
        summary,
        raw_text,
    })
}

fn coerce_merchant(value: Option<&JsonValue>) -> String {
    match value.and_then(JsonValue::as_str) {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => "Unknown".to_string(),
    }
}

/// Numeric coercion: accepts JSON numbers and numeric strings. Anything
/// unparseable or negative collapses to zero.
fn coerce_amount(value: Option<&JsonValue>) -> Decimal {
    let parsed = match value {
        Some(JsonValue::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        Some(JsonValue::String(s)) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    match parsed {
        Some(amount) if amount >= Decimal::ZERO => {
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }
        _ => Decimal::ZERO,
    }
}

fn coerce_category(value: Option<&JsonValue>) -> Category {
    value
        .and_then(JsonValue::as_str)
        .and_then(Category::parse)
        .unwrap_or(Category::Finance)
}

fn coerce_transaction_type(value: Option<&JsonValue>) -> TransactionType {
    value
        .and_then(JsonValue::as_str)
        .and_then(TransactionType::parse)
        .unwrap_or(TransactionType::Record)
}

fn coerce_date(value: Option<&JsonValue>) -> Option<NaiveDate> {
    let s = value.and_then(JsonValue::as_str)?;
    if !DATE_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn coerce_string(value: Option<&JsonValue>) -> String {
    value
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
    }

    #[test]
    fn test_json_span_strips_surrounding_prose() {
        let text = "Here is the data:\n```json\n{\"merchant\":\"Walmart\"}\n```\nDone.";
        assert_eq!(json_span(text), Some("{\"merchant\":\"Walmart\"}"));
    }

    #[test]
    fn test_json_span_none_without_braces() {
        assert_eq!(json_span("no json here"), None);
        assert_eq!(json_span("} reversed {"), None);
    }

    #[test]
    fn test_normalize_full_receipt() {
        let out = r#"{"merchant":"Walmart","amount":47.53,"category":"Finance",
            "transaction_type":"expense","date":"2025-01-15","due_date":null,
            "summary":"Groceries.","raw_text":"WALMART SUPERCENTER..."}"#;
        let doc = normalize(out, today()).unwrap();
        assert_eq!(doc.merchant, "Walmart");
        assert_eq!(doc.amount, Decimal::new(4753, 2));
        assert_eq!(doc.category, Category::Finance);
        assert_eq!(doc.transaction_type, TransactionType::Expense);
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(doc.due_date, None);
        assert_eq!(doc.summary, "Groceries.");
        assert_eq!(doc.raw_text, "WALMART SUPERCENTER...");
    }

    #[test]
    fn test_normalize_no_json_is_format_error() {
        match normalize("I could not read this document.", today()) {
            Err(Error::ExtractionFormat) => {}
            other => panic!("expected ExtractionFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_malformed_json_is_parse_error() {
        match normalize("{\"merchant\": unquoted}", today()) {
            Err(Error::ExtractionParse(_)) => {}
            other => panic!("expected ExtractionParse, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_merchant_defaults_to_unknown() {
        let doc = normalize(r#"{"merchant":"   "}"#, today()).unwrap();
        assert_eq!(doc.merchant, "Unknown");
        let doc = normalize(r#"{"amount":5}"#, today()).unwrap();
        assert_eq!(doc.merchant, "Unknown");
    }

    #[test]
    fn test_merchant_is_trimmed() {
        let doc = normalize(r#"{"merchant":"  Acme Corp  "}"#, today()).unwrap();
        assert_eq!(doc.merchant, "Acme Corp");
    }

    #[test]
    fn test_amount_string_coercion() {
        let doc = normalize(
            r#"{"amount":"12.45","transaction_type":"expense"}"#,
            today(),
        )
        .unwrap();
        assert_eq!(doc.amount, Decimal::new(1245, 2));
    }

    #[test]
    fn test_amount_garbage_and_negative_collapse_to_zero() {
        let doc = normalize(r#"{"amount":"abc","transaction_type":"expense"}"#, today()).unwrap();
        assert_eq!(doc.amount, Decimal::ZERO);
        let doc = normalize(r#"{"amount":-3.50,"transaction_type":"expense"}"#, today()).unwrap();
        assert_eq!(doc.amount, Decimal::ZERO);
    }

    #[test]
    fn test_amount_rounds_to_two_decimals() {
        let doc = normalize(
            r#"{"amount":10.005,"transaction_type":"expense"}"#,
            today(),
        )
        .unwrap();
        assert_eq!(doc.amount, Decimal::new(1001, 2));
    }

    #[test]
    fn test_unknown_category_forced_to_finance() {
        let doc = normalize(r#"{"category":"Unknown-category"}"#, today()).unwrap();
        assert_eq!(doc.category, Category::Finance);
    }

    #[test]
    fn test_bogus_transaction_type_forces_record_and_zero_amount() {
        let doc = normalize(
            r#"{"transaction_type":"bogus","amount":99.99}"#,
            today(),
        )
        .unwrap();
        assert_eq!(doc.transaction_type, TransactionType::Record);
        assert_eq!(doc.amount, Decimal::ZERO);
    }

    #[test]
    fn test_record_zeroes_valid_amount() {
        let doc = normalize(
            r#"{"transaction_type":"record","amount":65000}"#,
            today(),
        )
        .unwrap();
        assert_eq!(doc.amount, Decimal::ZERO);
    }

    #[test]
    fn test_bad_date_replaced_with_today() {
        let doc = normalize(r#"{"date":"01/15/2025"}"#, today()).unwrap();
        assert_eq!(doc.date, today());
        let doc = normalize(r#"{"date":"2025-13-45"}"#, today()).unwrap();
        assert_eq!(doc.date, today());
    }

    #[test]
    fn test_bad_due_date_becomes_none() {
        let doc = normalize(r#"{"due_date":"next week"}"#, today()).unwrap();
        assert_eq!(doc.due_date, None);
        let doc = normalize(r#"{"due_date":"2026-03-01"}"#, today()).unwrap();
        assert_eq!(doc.due_date, NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let doc = normalize("{}", today()).unwrap();
        assert_eq!(doc.merchant, "Unknown");
        assert_eq!(doc.amount, Decimal::ZERO);
        assert_eq!(doc.category, Category::Finance);
        assert_eq!(doc.transaction_type, TransactionType::Record);
        assert_eq!(doc.date, today());
        assert_eq!(doc.due_date, None);
        assert_eq!(doc.summary, "");
        assert_eq!(doc.raw_text, "");
    }

    #[test]
    fn test_invariants_hold_for_normalized_records() {
        let outputs = [
            r#"{"merchant":"A","amount":-1,"category":"zzz","transaction_type":"zzz"}"#,
            r#"{"merchant":"B","amount":"1e3","category":"Health","transaction_type":"income"}"#,
            r#"{"transaction_type":"record","amount":500}"#,
        ];
        for out in outputs {
            let doc = normalize(out, today()).unwrap();
            assert!(doc.amount >= Decimal::ZERO);
            assert!(Category::parse(doc.category.as_str()).is_some());
            assert!(TransactionType::parse(doc.transaction_type.as_str()).is_some());
            if doc.transaction_type == TransactionType::Record {
                assert_eq!(doc.amount, Decimal::ZERO);
            }
        }
    }
}
