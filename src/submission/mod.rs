//! Boundary types for the batch submission collaborator.
//!
//! The surrounding application hands a validated batch to an external
//! create/update-many endpoint and receives per-record outcomes back. This
//! crate only shapes that exchange and surfaces counts; it never performs
//! the network call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ParsedRecord;

/// A validated batch addressed to a location/tenant, ready to be posted as
/// a JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSubmission {
    /// Location/tenant identifier the records belong to.
    pub location: String,
    /// Parsed records, in original row order.
    pub records: Vec<ParsedRecord>,
}

impl BatchSubmission {
    pub fn new(location: impl Into<String>, records: Vec<ParsedRecord>) -> Self {
        Self {
            location: location.into(),
            records,
        }
    }
}

/// Per-record outcomes returned by the submission endpoint.
///
/// Person uploads report created/updated/failed; wage uploads report
/// created/skipped/failed. Absent partitions stay `None` so the summary
/// mirrors whichever shape came back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResults {
    #[serde(default)]
    pub created: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<Vec<Value>>,
    #[serde(default)]
    pub failed: Vec<Value>,
}

impl SubmissionResults {
    /// Count summary for display, e.g.
    /// `Upload successful. Created: 2, Updated: 1, Failed: 0`.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("Created: {}", self.created.len())];
        if let Some(updated) = &self.updated {
            parts.push(format!("Updated: {}", updated.len()));
        }
        if let Some(skipped) = &self.skipped {
            parts.push(format!("Skipped: {}", skipped.len()));
        }
        parts.push(format!("Failed: {}", self.failed.len()));
        format!("Upload successful. {}", parts.join(", "))
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
