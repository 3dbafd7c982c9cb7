//! # Bulkops - bulk CSV import validation and cart aggregation
//!
//! Bulkops validates CSV-shaped batches of people and wage records for a
//! facility account system, accumulating row-level errors across the whole
//! batch, and aggregates point-of-sale cart selections against an account
//! balance.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  Raw text   │────▶│  Tokenizer  │────▶│  Validator  │────▶│ Batch result │
//! │ (paste/file)│     │ (split/trim)│     │  (schema)   │     │ records+errs │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bulkops::{validate_batch, Schema};
//!
//! let result = validate_batch(csv_text, &Schema::person_batch());
//! if result.is_valid {
//!     send(result.parsed_data);
//! } else {
//!     show(result.error_lines());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (RowError, BatchValidationResult)
//! - [`schema`] - Import schemas and presets
//! - [`tokenizer`] - Structural tokenization and file ingestion
//! - [`validate`] - Batch validation engine
//! - [`cart`] - Point-of-sale cart aggregation
//! - [`pipeline`] - High-level async import pipeline
//! - [`submission`] - Batch submission boundary types
//! - [`logs`] - Progress log bus

// Core modules
pub mod error;
pub mod models;

// Schemas
pub mod schema;

// Parsing
pub mod tokenizer;

// Validation
pub mod validate;

// Cart
pub mod cart;

// Pipeline
pub mod pipeline;

// Submission boundary
pub mod submission;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CartError, ImportError, SchemaError, StructureError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{BatchValidationResult, ParsedRecord, RowError};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use schema::{FieldDef, FieldKind, Schema};

// =============================================================================
// Re-exports - Tokenizer
// =============================================================================

pub use tokenizer::{
    decode_content, detect_encoding, read_batch_file, tokenize, RawBatch, Tokens,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validate::{
    validate_batch, validate_batch_with, validate_tokens, ColumnBinding, ErrorAccumulator,
    ValidateOptions,
};

// =============================================================================
// Re-exports - Cart
// =============================================================================

pub use cart::{can_submit, AggregatedCartEntry, Cart, CartLine, PurchaseLine};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{process_batch, ImportOptions, ImportReport};

// =============================================================================
// Re-exports - Submission
// =============================================================================

pub use submission::{BatchSubmission, SubmissionResults};
