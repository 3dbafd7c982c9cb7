//! High-level import pipeline.
//!
//! Combines tokenization and validation into one entry point and shapes the
//! outcome for the caller: a job id, a status, and a display summary. The
//! validation pass itself is synchronous; the pipeline is async only so a
//! caller can simulate upload latency between validation and result
//! delivery, the way the interactive flow does.
//!
//! # Example
//!
//! ```rust,ignore
//! use bulkops::{process_batch, ImportOptions, Schema};
//!
//! #[tokio::main]
//! async fn main() {
//!     let report = process_batch(
//!         "inmateNumber,firstName,lastName,balance,status\nA1,John,Doe,100,active",
//!         &Schema::person_batch(),
//!         &ImportOptions::default(),
//!     )
//!     .await;
//!     println!("{}", report.summary);
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logs::{log_error, log_info, log_success};
use crate::models::BatchValidationResult;
use crate::schema::Schema;
use crate::validate::{validate_batch_with, ValidateOptions};

/// Options for one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Tokenizer and binding options.
    pub validate: ValidateOptions,
    /// Optional pause between validation and result delivery, simulating
    /// upload latency. `None` delivers immediately.
    pub processing_delay: Option<Duration>,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Unique job identifier.
    pub job_id: String,
    /// `"ready"` when every row parsed, `"invalid"` otherwise.
    pub status: String,
    /// Display summary for the end user.
    pub summary: String,
    /// When the run finished (RFC 3339).
    pub processed_at: String,
    /// Which schema preset was applied.
    pub schema_name: String,
    /// The full validation result.
    pub result: BatchValidationResult,
}

impl ImportReport {
    fn new(schema: &Schema, status: &str, summary: String, result: BatchValidationResult) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            summary,
            processed_at: chrono::Utc::now().to_rfc3339(),
            schema_name: schema.name().to_string(),
            result,
        }
    }
}

/// Validate a raw batch and deliver an [`ImportReport`].
///
/// Invalid batches return immediately with the complete error list; the
/// simulated delay only applies to successful validation, matching the
/// interactive flow it mirrors.
pub async fn process_batch(raw: &str, schema: &Schema, options: &ImportOptions) -> ImportReport {
    log_info(format!("Validating {} batch...", schema.name()));
    let result = validate_batch_with(raw, schema, &options.validate);

    if !result.is_valid {
        log_error(format!("{} validation error(s)", result.errors.len()));
        for line in result.error_lines().iter().take(5) {
            log_error(line.clone());
        }
        let summary = format!("Validation failed with {} error(s)", result.errors.len());
        return ImportReport::new(schema, "invalid", summary, result);
    }

    if let Some(delay) = options.processing_delay {
        log_info("Uploading...");
        tokio::time::sleep(delay).await;
    }

    let summary = format!(
        "Successfully processed {} {}",
        result.parsed_data.len(),
        schema.record_noun()
    );
    log_success(summary.clone());
    ImportReport::new(schema, "ready", summary, result)
}
