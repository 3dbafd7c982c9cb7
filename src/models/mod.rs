//! Domain models for the bulk import pipeline.
//!
//! This module contains the core data structures shared across the pipeline:
//!
//! - [`RowError`] - one validation failure, keyed by row number and field
//! - [`ParsedRecord`] - a fully validated row as a typed JSON object
//! - [`BatchValidationResult`] - the terminal value of a validation pass

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel field name for row- and batch-level failures.
pub const FIELD_GENERAL: &str = "general";

/// Sentinel field name for header failures.
pub const FIELD_HEADERS: &str = "headers";

// =============================================================================
// Row Error
// =============================================================================

/// One validation failure.
///
/// Row numbers are 1-based with the header as row 1, so the first data row
/// is row 2. Row 0 is reserved for whole-batch failures (empty input,
/// malformed header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// 1-based row number; 0 for batch-level failures.
    pub row: u32,
    /// Field name, or `"general"` / `"headers"` for row- and batch-level
    /// failures.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl RowError {
    pub fn new(row: u32, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.into(),
            message: message.into(),
        }
    }

    /// A whole-batch failure (row 0, field `"general"`).
    pub fn batch(message: impl Into<String>) -> Self {
        Self::new(0, FIELD_GENERAL, message)
    }

    /// A header failure (row 0, field `"headers"`).
    pub fn headers(message: impl Into<String>) -> Self {
        Self::new(0, FIELD_HEADERS, message)
    }
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.row > 0 {
            write!(f, "Row {}: {}", self.row, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

// =============================================================================
// Parsed Record
// =============================================================================

/// A row that passed all validations, as a JSON object mapping each schema
/// field name to its coerced value (numeric fields become JSON numbers,
/// everything else stays a trimmed string).
///
/// Records are JSON objects so a caller can hand the whole batch to a
/// create/update-many API endpoint as a JSON array without conversion.
pub type ParsedRecord = Value;

// =============================================================================
// Batch Validation Result
// =============================================================================

/// The terminal value of a validation pass.
///
/// `is_valid` is true if and only if `errors` is empty. `errors` are in
/// detection order (row-major, then field order within a row); `parsed_data`
/// is in original row order. Every data row contributes to exactly one of
/// the two lists: a row with any error produces no record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchValidationResult {
    pub is_valid: bool,
    pub errors: Vec<RowError>,
    pub parsed_data: Vec<ParsedRecord>,
}

impl BatchValidationResult {
    /// Assemble a result from accumulated errors and parsed records.
    ///
    /// Pure assembly, no validation logic: exposed separately so a caller
    /// can delay result delivery (e.g. to simulate upload latency) without
    /// re-running validation.
    pub fn build(errors: Vec<RowError>, parsed_data: Vec<ParsedRecord>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            parsed_data,
        }
    }

    /// A result carrying a single batch-level error.
    pub fn batch_failure(error: RowError) -> Self {
        Self::build(vec![error], Vec::new())
    }

    /// The error list rendered as flat `Row N: message` strings for direct
    /// display to the end user.
    pub fn error_lines(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_error_display() {
        let err = RowError::new(3, "status", "Status is required");
        assert_eq!(err.to_string(), "Row 3: Status is required");

        let batch = RowError::batch("CSV data is empty");
        assert_eq!(batch.to_string(), "CSV data is empty");
        assert_eq!(batch.row, 0);
        assert_eq!(batch.field, FIELD_GENERAL);
    }

    #[test]
    fn test_build_sets_is_valid() {
        let ok = BatchValidationResult::build(vec![], vec![json!({"a": 1})]);
        assert!(ok.is_valid);
        assert_eq!(ok.parsed_data.len(), 1);

        let bad = BatchValidationResult::build(
            vec![RowError::new(2, "balance", "Balance must be a valid number")],
            vec![],
        );
        assert!(!bad.is_valid);
        assert_eq!(bad.error_lines(), vec!["Row 2: Balance must be a valid number"]);
    }

    #[test]
    fn test_serialization_shape() {
        let result = BatchValidationResult::build(
            vec![RowError::headers("Headers must be exactly: a, b")],
            vec![],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"][0]["row"], 0);
        assert_eq!(json["errors"][0]["field"], "headers");
        assert_eq!(json["parsedData"], json!([]));
    }
}
