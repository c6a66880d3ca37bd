//! Inventory record models
//!
//! [`SourceRecord`] is a row as read from the datastore and [`OutputRecord`]
//! is the validated, quantity-adjusted line that lands in the artifact.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row from the source datastore
///
/// Read-only to stockfeed. `quantity` is `None` when the datastore value was
/// missing or not numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Ordered primary key, strictly increasing and unique
    pub id: i64,

    /// Part number as stored (not yet trimmed)
    pub part_number: String,

    /// Raw quantity
    pub quantity: Option<f64>,
}

impl SourceRecord {
    /// Create a new source record
    pub fn new(id: i64, part_number: impl Into<String>, quantity: Option<f64>) -> Self {
        Self {
            id,
            part_number: part_number.into(),
            quantity,
        }
    }
}

/// One accepted line of the artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Trimmed, non-empty part number
    pub part_number: String,

    /// Adjusted quantity, always positive
    pub quantity: i64,
}

/// Interpret a datastore value as a raw quantity
///
/// Numbers are taken as-is, numeric strings are parsed, anything else
/// (null, booleans, garbage text, non-finite values) yields `None`.
///
/// # Examples
///
/// ```
/// use stockfeed::domain::record::parse_quantity;
/// use serde_json::json;
///
/// assert_eq!(parse_quantity(&json!(12)), Some(12.0));
/// assert_eq!(parse_quantity(&json!(" 7.5 ")), Some(7.5));
/// assert_eq!(parse_quantity(&json!("n/a")), None);
/// assert_eq!(parse_quantity(&json!(null)), None);
/// ```
pub fn parse_quantity(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_quantity_str(s),
        _ => None,
    };
    parsed.filter(|q| q.is_finite())
}

/// Interpret a textual datastore value as a raw quantity
pub fn parse_quantity_str(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|q| q.is_finite())
}

/// Interpret a datastore value as a part number
///
/// Strings are used verbatim and numbers are rendered, so numeric part
/// numbers survive. Anything else becomes an empty string and is rejected
/// later by the transformer.
pub fn part_number_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
