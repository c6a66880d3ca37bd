//! Schema mapping between logical fields and source columns

use crate::config::ColumnCandidates;
use crate::domain::{Result, SourceError};
use serde::{Deserialize, Serialize};

/// Resolved column names for one source table
///
/// Built once at startup and handed to the datastore for every page fetch, so
/// backends never guess column names per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMapping {
    /// Source table
    pub table: String,

    /// Ordered key column
    pub id: String,

    /// Part number column
    pub part_number: String,

    /// Quantity column
    pub quantity: String,
}

impl SchemaMapping {
    /// Resolve candidates against the columns the backend reported
    ///
    /// The first candidate present in `available` wins for each field. When the
    /// backend could not report columns (`None`), the first candidate of each
    /// field is used as-is.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnrecognizedSchema`] naming the first field with no
    /// matching column, together with the available columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockfeed::config::ColumnCandidates;
    /// use stockfeed::core::reader::SchemaMapping;
    ///
    /// let available = vec!["id".to_string(), "partNumber".to_string(), "qty".to_string()];
    /// let mapping =
    ///     SchemaMapping::resolve("inventory", &ColumnCandidates::default(), Some(&available))
    ///         .unwrap();
    ///
    /// assert_eq!(mapping.part_number, "partNumber");
    /// assert_eq!(mapping.quantity, "qty");
    /// ```
    pub fn resolve(
        table: &str,
        candidates: &ColumnCandidates,
        available: Option<&[String]>,
    ) -> Result<Self> {
        let pick = |field: &str, names: &[String]| -> Result<String> {
            let chosen = match available {
                Some(columns) => names.iter().find(|name| columns.contains(name)),
                None => names.first(),
            };

            chosen.cloned().ok_or_else(|| {
                let columns = available.map(|c| c.join(", ")).unwrap_or_default();
                SourceError::UnrecognizedSchema(format!(
                    "no column for '{field}' in table '{table}' (candidates: {}; available: {})",
                    names.join(", "),
                    columns
                ))
                .into()
            })
        };

        let mapping = Self {
            table: table.to_string(),
            id: pick("id", &candidates.id)?,
            part_number: pick("part_number", &candidates.part_number)?,
            quantity: pick("quantity", &candidates.quantity)?,
        };

        tracing::info!(
            table = %mapping.table,
            id = %mapping.id,
            part_number = %mapping.part_number,
            quantity = %mapping.quantity,
            discovered = available.is_some(),
            "Resolved source schema"
        );

        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StockfeedError;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_matching_candidate_wins() {
        let candidates = ColumnCandidates {
            id: columns(&["id"]),
            part_number: columns(&["sku", "part_number"]),
            quantity: columns(&["quantity", "qty"]),
        };
        let available = columns(&["id", "part_number", "sku", "qty"]);

        let mapping = SchemaMapping::resolve("inventory", &candidates, Some(&available)).unwrap();
        assert_eq!(mapping.part_number, "sku");
        assert_eq!(mapping.quantity, "qty");
    }

    #[test]
    fn test_unrecognized_schema_names_field() {
        let available = columns(&["id", "part_number", "stock_level"]);
        let err =
            SchemaMapping::resolve("inventory", &ColumnCandidates::default(), Some(&available))
                .unwrap_err();

        assert!(matches!(
            err,
            StockfeedError::Source(SourceError::UnrecognizedSchema(_))
        ));
        let message = err.to_string();
        assert!(message.contains("'quantity'"));
        assert!(message.contains("stock_level"));
    }

    #[test]
    fn test_undiscoverable_uses_first_candidates() {
        let mapping = SchemaMapping::resolve("inventory", &ColumnCandidates::default(), None)
            .unwrap();
        assert_eq!(mapping.id, "id");
        assert_eq!(mapping.part_number, "part_number");
        assert_eq!(mapping.quantity, "quantity");
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let available = columns(&["ID", "PART_NUMBER", "QUANTITY"]);
        assert!(
            SchemaMapping::resolve("inventory", &ColumnCandidates::default(), Some(&available))
                .is_err()
        );
    }
}
