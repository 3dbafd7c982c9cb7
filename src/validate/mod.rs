//! Batch validation against an import schema.
//!
//! The validator consumes tokenized rows and a [`Schema`], accumulates
//! errors across the whole batch instead of stopping at the first failure,
//! and partitions data rows into parsed records and row errors. Only two
//! conditions abort early: empty/header-only input and a header missing a
//! required field name. Everything else is recovered locally into a
//! [`RowError`] so the user can fix an entire batch in one pass.

pub mod accumulator;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::{BatchValidationResult, RowError, FIELD_GENERAL};
use crate::schema::{FieldDef, FieldKind, Schema};
use crate::tokenizer::{tokenize, Tokens, DEFAULT_FIELD_DELIMITER, DEFAULT_LINE_DELIMITER};

pub use accumulator::ErrorAccumulator;

/// Exact `YYYY-MM-DD` shape. Pattern only; the calendar is not consulted.
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

// =============================================================================
// Options
// =============================================================================

/// How row tokens are bound to schema fields.
///
/// Positional binding reads columns in schema-declared order even when the
/// header lists them differently, so a header-reordered file misassigns
/// columns; it stays the default for compatibility with existing import
/// files. ByHeader follows the header's own order instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnBinding {
    /// Bind tokens by schema-canonical position (bug-compatible default).
    #[default]
    Positional,
    /// Bind each schema field to the column whose header carries its name.
    ByHeader,
}

/// Validation options.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub field_delimiter: char,
    pub line_delimiter: char,
    pub binding: ColumnBinding,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            field_delimiter: DEFAULT_FIELD_DELIMITER,
            line_delimiter: DEFAULT_LINE_DELIMITER,
            binding: ColumnBinding::default(),
        }
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Validate raw delimited text against a schema with default options.
///
/// Never panics and never returns an error for malformed input: every
/// failure is reported through the result's error list.
pub fn validate_batch(raw: &str, schema: &Schema) -> BatchValidationResult {
    validate_batch_with(raw, schema, &ValidateOptions::default())
}

/// Validate raw delimited text with explicit options.
pub fn validate_batch_with(
    raw: &str,
    schema: &Schema,
    options: &ValidateOptions,
) -> BatchValidationResult {
    match tokenize(raw, options.field_delimiter, options.line_delimiter) {
        Ok(tokens) => validate_tokens(&tokens, schema, options.binding),
        Err(structure) => {
            BatchValidationResult::batch_failure(RowError::batch(structure.to_string()))
        }
    }
}

/// Validate already-tokenized rows against a schema.
pub fn validate_tokens(
    tokens: &Tokens,
    schema: &Schema,
    binding: ColumnBinding,
) -> BatchValidationResult {
    // Header check: every schema field name must appear, in any order.
    // Extra columns are tolerated; any missing name fails the whole batch
    // with a single headers error.
    let mut header_positions = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        match tokens.header.iter().position(|h| h == &field.name) {
            Some(index) => header_positions.push(index),
            None => {
                return BatchValidationResult::batch_failure(RowError::headers(format!(
                    "Headers must be exactly: {}",
                    schema.expected_header()
                )));
            }
        }
    }

    let mut acc = ErrorAccumulator::new();
    let mut parsed_data: Vec<Value> = Vec::new();

    for (index, row) in tokens.data_rows.iter().enumerate() {
        // Header is row 1, so the first data row is row 2
        let row_number = index as u32 + 2;

        if row.len() != schema.len() {
            acc.add(
                row_number,
                FIELD_GENERAL,
                format!(
                    "Row {}: Expected {} fields, got {}",
                    row_number,
                    schema.len(),
                    row.len()
                ),
            );
            continue;
        }

        let mut values: Vec<&str> = Vec::with_capacity(schema.len());
        for (i, field) in schema.fields().iter().enumerate() {
            let column = match binding {
                ColumnBinding::Positional => i,
                ColumnBinding::ByHeader => header_positions[i],
            };
            // ByHeader can point past the row when the header carries extra
            // columns; a missing token is treated as blank
            let value = row.get(column).map(String::as_str).unwrap_or("");
            values.push(value);
            check_field(&mut acc, row_number, field, value);
        }

        if !acc.has_error_for_row(row_number) {
            parsed_data.push(build_record(schema, &values));
        }
    }

    BatchValidationResult::build(acc.into_errors(), parsed_data)
}

// =============================================================================
// Field checks
// =============================================================================

/// Run the required check, then the type check, for one field. Both may
/// fire for the same field: an empty numeric value reports "is required"
/// and "must be a valid number" together.
fn check_field(acc: &mut ErrorAccumulator, row_number: u32, field: &FieldDef, value: &str) {
    if field.required && value.is_empty() {
        acc.add(row_number, &field.name, field.required_message());
    }

    let failed = match &field.kind {
        FieldKind::Text => false,
        FieldKind::Number => parse_finite(value).is_none(),
        FieldKind::NonNegativeNumber => !matches!(parse_finite(value), Some(n) if n >= 0.0),
        FieldKind::Enum(allowed) => {
            !value.is_empty() && !allowed.iter().any(|candidate| candidate == value)
        }
        FieldKind::Date => !value.is_empty() && !DATE_PATTERN.is_match(value),
    };

    if failed {
        if let Some(message) = field.kind.type_message(&field.display_name) {
            acc.add(row_number, &field.name, message);
        }
    }
}

/// Parse a finite number; `inf`/`NaN` spellings are rejected.
fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Bind an error-free row into a typed record: numeric fields become JSON
/// numbers, everything else stays a trimmed string.
fn build_record(schema: &Schema, values: &[&str]) -> Value {
    let mut record = Map::new();
    for (field, value) in schema.fields().iter().zip(values) {
        let typed = match &field.kind {
            FieldKind::Number | FieldKind::NonNegativeNumber => parse_finite(value)
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(value.to_string())),
            _ => Value::String(value.to_string()),
        };
        record.insert(field.name.clone(), typed);
    }
    Value::Object(record)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PERSON_HEADER: &str = "inmateNumber,firstName,lastName,balance,status";
    const WAGE_HEADER: &str = "inmateNumber,wageAmount,wageType,paymentDate,description";

    fn person(raw: &str) -> BatchValidationResult {
        validate_batch(raw, &Schema::person_batch())
    }

    fn wage(raw: &str) -> BatchValidationResult {
        validate_batch(raw, &Schema::wage_batch())
    }

    #[test]
    fn test_empty_input() {
        let result = person("");
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 0);
        assert_eq!(result.errors[0].field, "general");
        assert_eq!(result.errors[0].message, "CSV data is empty");
        assert!(result.parsed_data.is_empty());

        let whitespace = person("   \n  ");
        assert_eq!(whitespace.errors[0].message, "CSV data is empty");
    }

    #[test]
    fn test_header_only() {
        let result = person(PERSON_HEADER);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "CSV must contain at least a header and one data row"
        );
    }

    #[test]
    fn test_missing_header_field() {
        // Valid data rows, but the header lacks "status"
        let raw = "inmateNumber,firstName,lastName,balance\nA1,John,Doe,100,active";
        let result = person(raw);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 0);
        assert_eq!(result.errors[0].field, "headers");
        assert_eq!(
            result.errors[0].message,
            "Headers must be exactly: inmateNumber, firstName, lastName, balance, status"
        );
        assert!(result.parsed_data.is_empty());
    }

    #[test]
    fn test_extra_header_columns_tolerated() {
        let raw = format!("{},notes\nA1,John,Doe,100,active", PERSON_HEADER);
        let result = person(&raw);
        assert!(result.is_valid);
        assert_eq!(result.parsed_data.len(), 1);
    }

    #[test]
    fn test_valid_person_batch() {
        let raw = format!("{}\nA1,John,Doe,100,active\nA2,Jane,Roe,0,inactive", PERSON_HEADER);
        let result = person(&raw);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.parsed_data.len(), 2);

        assert_eq!(result.parsed_data[0]["inmateNumber"], "A1");
        assert_eq!(result.parsed_data[0]["firstName"], "John");
        assert_eq!(result.parsed_data[0]["balance"], 100.0);
        assert_eq!(result.parsed_data[0]["status"], "active");
        assert_eq!(result.parsed_data[1]["balance"], 0.0);
    }

    #[test]
    fn test_row_field_count_mismatch() {
        // Short row is skipped with one general error; the sibling row still
        // parses
        let raw = format!("{}\nA1,John,Doe,100\nA2,Jane,Roe,50,active", PERSON_HEADER);
        let result = person(&raw);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 2);
        assert_eq!(result.errors[0].field, "general");
        assert_eq!(result.errors[0].message, "Row 2: Expected 5 fields, got 4");
        assert_eq!(result.parsed_data.len(), 1);
        assert_eq!(result.parsed_data[0]["inmateNumber"], "A2");
    }

    #[test]
    fn test_scenario_a_enum_rejection() {
        let raw = format!("{}\nA1,John,Doe,100,active\nA2,Jane,Roe,-5,retired", PERSON_HEADER);
        let result = person(&raw);
        assert!(!result.is_valid);
        // Negative balance passes (numeric parse only); the enum is the one
        // failure
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 3);
        assert_eq!(result.errors[0].field, "status");
        assert_eq!(
            result.errors[0].message,
            "Status must be either \"active\" or \"inactive\""
        );
        assert_eq!(result.parsed_data.len(), 1);
        assert_eq!(result.parsed_data[0]["balance"], 100.0);
        assert_eq!(result.parsed_data[0]["status"], "active");
    }

    #[test]
    fn test_required_and_type_both_fire() {
        let raw = format!("{}\nA1,John,Doe,,active", PERSON_HEADER);
        let result = person(&raw);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].message, "Balance is required");
        assert_eq!(result.errors[1].message, "Balance must be a valid number");
        assert!(result.parsed_data.is_empty());
    }

    #[test]
    fn test_non_numeric_balance() {
        let raw = format!("{}\nA1,John,Doe,abc,active", PERSON_HEADER);
        let result = person(&raw);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Balance must be a valid number");
    }

    #[test]
    fn test_infinite_balance_rejected() {
        let raw = format!("{}\nA1,John,Doe,inf,active", PERSON_HEADER);
        let result = person(&raw);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Balance must be a valid number");
    }

    #[test]
    fn test_scenario_b_negative_wage() {
        let raw = format!("{}\nW1,-50,hourly,2024-01-15,desc", WAGE_HEADER);
        let result = wage(&raw);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 2);
        assert_eq!(result.errors[0].field, "wageAmount");
        assert_eq!(result.errors[0].message, "Wage amount must be a positive number");
        assert!(result.parsed_data.is_empty());
    }

    #[test]
    fn test_valid_wage_batch() {
        let raw = format!("{}\nW1,50,hourly,2024-01-15,Workshop wages", WAGE_HEADER);
        let result = wage(&raw);
        assert!(result.is_valid);
        assert_eq!(result.parsed_data.len(), 1);
        assert_eq!(result.parsed_data[0]["wageAmount"], 50.0);
        assert_eq!(result.parsed_data[0]["wageType"], "hourly");
        assert_eq!(result.parsed_data[0]["paymentDate"], "2024-01-15");
    }

    #[test]
    fn test_wage_type_enum() {
        let raw = format!("{}\nW1,50,weekly,2024-01-15,desc", WAGE_HEADER);
        let result = wage(&raw);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "Wage type must be either \"hourly\", \"daily\", or \"bonus\""
        );
    }

    #[test]
    fn test_date_pattern() {
        let raw = format!("{}\nW1,50,hourly,15-01-2024,desc", WAGE_HEADER);
        let result = wage(&raw);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "paymentDate");
        assert_eq!(result.errors[0].message, "Payment date must be in YYYY-MM-DD format");

        // Pattern only: an impossible calendar date still passes
        let raw = format!("{}\nW1,50,hourly,2024-13-45,desc", WAGE_HEADER);
        assert!(wage(&raw).is_valid);
    }

    #[test]
    fn test_partition_no_row_in_both() {
        let raw = format!(
            "{}\nA1,John,Doe,100,active\nA2,,Roe,abc,retired\nA3,Jim,Low,5,inactive",
            PERSON_HEADER
        );
        let result = person(&raw);

        // Row 3 produced several errors and no record; rows 2 and 4 parsed
        let error_rows: std::collections::HashSet<u32> =
            result.errors.iter().map(|e| e.row).collect();
        assert_eq!(error_rows, [3].into_iter().collect());
        assert_eq!(result.parsed_data.len(), 2);
        assert_eq!(result.parsed_data[0]["inmateNumber"], "A1");
        assert_eq!(result.parsed_data[1]["inmateNumber"], "A3");
    }

    #[test]
    fn test_error_detection_order() {
        // Row-major, then field order within a row
        let raw = format!("{}\nA1,,Doe,abc,retired\n,Jane,Roe,5,active", PERSON_HEADER);
        let result = person(&raw);
        let messages: Vec<&str> = result.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "First name is required",
                "Balance must be a valid number",
                "Status must be either \"active\" or \"inactive\"",
                "Inmate number is required",
            ]
        );
    }

    #[test]
    fn test_idempotence() {
        let raw = format!("{}\nA1,John,Doe,100,active\nA2,Jane,Roe,-5,retired", PERSON_HEADER);
        let first = person(&raw);
        let second = person(&raw);
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_interior_line_counts_as_short_row() {
        let raw = format!("{}\nA1,John,Doe,100,active\n\nA2,Jane,Roe,5,active", PERSON_HEADER);
        let result = person(&raw);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Row 3: Expected 5 fields, got 1");
        assert_eq!(result.parsed_data.len(), 2);
    }

    #[test]
    fn test_positional_binding_quirk() {
        // Reordered header passes the header check, but positional binding
        // still reads columns in schema order: the misassigned status/balance
        // columns surface as type errors
        let raw = "firstName,inmateNumber,lastName,status,balance\nJohn,A1,Doe,active,100";
        let result = person(raw);
        assert!(!result.is_valid);
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["balance", "status"]);
    }

    #[test]
    fn test_by_header_binding_follows_header_order() {
        let raw = "firstName,inmateNumber,lastName,status,balance\nJohn,A1,Doe,active,100";
        let options = ValidateOptions {
            binding: ColumnBinding::ByHeader,
            ..ValidateOptions::default()
        };
        let result = validate_batch_with(raw, &Schema::person_batch(), &options);
        assert!(result.is_valid);
        assert_eq!(result.parsed_data[0]["inmateNumber"], "A1");
        assert_eq!(result.parsed_data[0]["balance"], 100.0);
        assert_eq!(result.parsed_data[0]["status"], "active");
    }

    #[test]
    fn test_semicolon_delimited_batch() {
        let raw = "inmateNumber;firstName;lastName;balance;status\nA1;John;Doe;100;active";
        let options = ValidateOptions {
            field_delimiter: ';',
            ..ValidateOptions::default()
        };
        let result = validate_batch_with(raw, &Schema::person_batch(), &options);
        assert!(result.is_valid);
        assert_eq!(result.parsed_data.len(), 1);
    }

    #[test]
    fn test_sample_csv_round_trip() {
        for schema in [Schema::person_batch(), Schema::wage_batch()] {
            let result = validate_batch(&schema.sample_csv(), &schema);
            assert!(result.is_valid, "sample for {} should validate", schema.name());
            assert_eq!(result.parsed_data.len(), 1);
        }
    }

    #[test]
    fn test_parsed_record_serializes_as_array() {
        let raw = format!("{}\nA1,John,Doe,100,active", PERSON_HEADER);
        let result = person(&raw);
        let payload = serde_json::to_value(&result.parsed_data).unwrap();
        assert_eq!(
            payload,
            json!([{
                "inmateNumber": "A1",
                "firstName": "John",
                "lastName": "Doe",
                "balance": 100.0,
                "status": "active"
            }])
        );
    }
}
