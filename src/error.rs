//! Error types for the bulk import pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`StructureError`] - batch-level CSV structure failures
//! - [`SchemaError`] - invalid schema definitions (programmer errors)
//! - [`CartError`] - cart mutation failures
//! - [`ImportError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Malformed user input is never surfaced through these types: per-row
//! validation failures accumulate as [`crate::models::RowError`] values
//! inside a [`crate::models::BatchValidationResult`] instead.

use thiserror::Error;

// =============================================================================
// Batch Structure Errors
// =============================================================================

/// Batch-level structural failures detected before row validation.
///
/// These are the only two conditions that abort a validation pass early.
/// Both map to a row-0 `"general"` error in the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// The trimmed input is empty.
    #[error("CSV data is empty")]
    EmptyInput,

    /// The input has a header line but no data rows.
    #[error("CSV must contain at least a header and one data row")]
    MissingDataRows,
}

// =============================================================================
// Schema Definition Errors
// =============================================================================

/// Errors constructing a [`crate::schema::Schema`].
///
/// These represent programmer errors in a schema definition, not bad user
/// input, and are the one place the crate returns `Err` for validation
/// concerns.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field name appears more than once.
    #[error("Duplicate field name in schema: {0}")]
    DuplicateField(String),

    /// The schema has no fields.
    #[error("Schema must define at least one field")]
    NoFields,
}

// =============================================================================
// Cart Errors
// =============================================================================

/// Errors mutating a point-of-sale cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Adding one more of this item would exceed its stock ceiling.
    #[error("Stock limit reached for item '{item_id}': {ceiling} in stock")]
    StockExceeded { item_id: String, ceiling: u32 },
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Top-level errors from the import entry points.
///
/// Returned by the CLI-facing helpers that read files from disk. Pure
/// validation never produces these; it reports through `RowError`s.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Failed to read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid schema definition.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for schema construction.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for cart operations.
pub type CartResult<T> = Result<T, CartError>;

/// Result type for import entry points.
pub type ImportResult<T> = Result<T, ImportError>;
