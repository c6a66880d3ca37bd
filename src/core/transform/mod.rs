//! Record transformation
//!
//! Maps a [`SourceRecord`] to an [`OutputRecord`] or rejects it. The rule is
//! applied per source row with no cross-record aggregation:
//!
//! 1. reject when the trimmed part number is empty
//! 2. `adjusted = round(raw * ratio)`, rounding half away from zero, negative
//!    results clamped to 0, missing or non-finite quantities treated as 0
//! 3. reject when `adjusted <= 0`
//!
//! # Example
//!
//! ```rust
//! use stockfeed::core::transform::RecordTransformer;
//! use stockfeed::domain::SourceRecord;
//!
//! let transformer = RecordTransformer::new(0.8);
//!
//! let out = transformer.transform(&SourceRecord::new(1, " A1 ", Some(10.0))).unwrap();
//! assert_eq!(out.part_number, "A1");
//! assert_eq!(out.quantity, 8);
//!
//! assert!(transformer.transform(&SourceRecord::new(2, "", Some(5.0))).is_none());
//! ```

use crate::domain::{OutputRecord, SourceRecord};

/// Applies the quantity adjustment and field validation
#[derive(Debug, Clone, Copy)]
pub struct RecordTransformer {
    ratio: f64,
}

impl RecordTransformer {
    /// Create a transformer with the configured ratio
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    /// Configured ratio
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Transform one record, or `None` when it is rejected
    pub fn transform(&self, record: &SourceRecord) -> Option<OutputRecord> {
        let part_number = record.part_number.trim();
        if part_number.is_empty() {
            return None;
        }

        let quantity = adjusted_quantity(record.quantity, self.ratio);
        if quantity <= 0 {
            return None;
        }

        Some(OutputRecord {
            part_number: part_number.to_string(),
            quantity,
        })
    }
}

/// Adjusted quantity for a raw value, never negative
pub fn adjusted_quantity(raw: Option<f64>, ratio: f64) -> i64 {
    let raw = raw.filter(|q| q.is_finite()).unwrap_or(0.0);
    let adjusted = (raw * ratio).round();

    // `as` saturates at the i64 bounds and maps NaN to 0
    (adjusted as i64).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some(10.0), 8 ; "ten")]
    #[test_case(Some(3.0), 2 ; "three rounds down")]
    #[test_case(Some(1.0), 1 ; "one rounds up")]
    #[test_case(Some(0.0), 0 ; "zero")]
    #[test_case(Some(-5.0), 0 ; "negative clamps")]
    #[test_case(Some(0.6), 0 ; "small rounds to zero")]
    #[test_case(None, 0 ; "missing")]
    #[test_case(Some(f64::NAN), 0 ; "nan")]
    #[test_case(Some(f64::INFINITY), 0 ; "infinite")]
    fn test_adjusted_quantity_default_ratio(raw: Option<f64>, expected: i64) {
        assert_eq!(adjusted_quantity(raw, 0.8), expected);
    }

    #[test_case(2.5, 3 ; "half rounds away from zero")]
    #[test_case(0.5, 1 ; "half of one")]
    #[test_case(-2.5, 0 ; "negative half clamps")]
    #[test_case(7.49, 7 ; "below half")]
    fn test_adjusted_quantity_unit_ratio(raw: f64, expected: i64) {
        assert_eq!(adjusted_quantity(Some(raw), 1.0), expected);
    }

    #[test]
    fn test_huge_quantity_saturates() {
        assert_eq!(adjusted_quantity(Some(1e30), 1.0), i64::MAX);
    }

    #[test_case("", Some(5.0) ; "empty part number")]
    #[test_case("   ", Some(5.0) ; "blank part number")]
    #[test_case("A1", Some(0.0) ; "zero quantity")]
    #[test_case("A1", Some(-3.0) ; "negative quantity")]
    #[test_case("A1", None ; "missing quantity")]
    fn test_rejected(part_number: &str, quantity: Option<f64>) {
        let transformer = RecordTransformer::new(0.8);
        let record = SourceRecord::new(1, part_number, quantity);
        assert!(transformer.transform(&record).is_none());
    }

    #[test]
    fn test_part_number_is_trimmed() {
        let transformer = RecordTransformer::new(0.8);
        let out = transformer
            .transform(&SourceRecord::new(1, "\tB2 ", Some(1.0)))
            .unwrap();

        assert_eq!(
            out,
            OutputRecord {
                part_number: "B2".to_string(),
                quantity: 1,
            }
        );
    }

    #[test]
    fn test_transform_is_deterministic() {
        let transformer = RecordTransformer::new(1.25);
        let record = SourceRecord::new(7, "C3", Some(4.0));
        assert_eq!(
            transformer.transform(&record),
            transformer.transform(&record)
        );
        assert_eq!(transformer.ratio(), 1.25);
    }
}
