//! Append-only error accumulation.
//!
//! Collects [`RowError`]s in detection order while keeping a side index of
//! row numbers, so "does this row already have any error" is O(1). The
//! validator consults that index to decide whether a row may emit a record.

use std::collections::HashSet;

use crate::models::RowError;

/// Ordered error list with an O(1) row-membership index.
#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    errors: Vec<RowError>,
    rows_with_errors: HashSet<u32>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error, recording its row in the side index.
    pub fn add(&mut self, row: u32, field: impl Into<String>, message: impl Into<String>) {
        self.push(RowError::new(row, field, message));
    }

    /// Append an already-built error.
    pub fn push(&mut self, error: RowError) {
        self.rows_with_errors.insert(error.row);
        self.errors.push(error);
    }

    /// Whether any error has been recorded for this row.
    pub fn has_error_for_row(&self, row: u32) -> bool {
        self.rows_with_errors.contains(&row)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the accumulator, yielding errors in insertion order.
    pub fn into_errors(self) -> Vec<RowError> {
        self.errors
    }
}
