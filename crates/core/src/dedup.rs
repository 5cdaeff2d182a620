// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Duplicate detection against previously ingested orders.
//!
//! A row is a duplicate when its non-empty order number already exists
//! in the store. Rows with empty identifiers can never match and are
//! always treated as new.

use bulk_orders_domain::OrderRecord;
use std::collections::HashSet;

/// How an ingestion request wants duplicates handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Report duplicate counts and batch info without writing anything.
    DryRun,
    /// Write only the new rows; leave existing rows untouched.
    SkipDuplicates,
    /// Write everything, replacing existing rows that share an identifier.
    Overwrite,
}

impl ResolutionMode {
    /// Derives the mode from the two request flags. Overwrite wins when
    /// both are set; neither flag means a confirmation dry run.
    #[must_use]
    pub const fn from_flags(overwrite_duplicates: bool, skip_duplicate_check: bool) -> Self {
        if overwrite_duplicates {
            Self::Overwrite
        } else if skip_duplicate_check {
            Self::SkipDuplicates
        } else {
            Self::DryRun
        }
    }
}

/// Counts produced by classifying a batch against existing identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateReport {
    /// Total rows in the batch.
    pub total: usize,
    /// Rows whose identifier was not found in the store.
    pub new_count: usize,
    /// Rows whose identifier already exists.
    pub duplicate_count: usize,
}

/// Collects the non-empty identifiers of a batch for the store lookup.
#[must_use]
pub fn candidate_identifiers(batch: &[OrderRecord]) -> HashSet<String> {
    batch
        .iter()
        .filter(|row| !row.order_number.is_empty())
        .map(|row| row.order_number.value().to_string())
        .collect()
}

/// Returns true if `row` collides with an already ingested identifier.
#[must_use]
pub fn is_duplicate(row: &OrderRecord, existing: &HashSet<String>) -> bool {
    !row.order_number.is_empty() && existing.contains(row.order_number.value())
}

/// Classifies every row in the batch against the existing identifiers.
#[must_use]
pub fn classify(batch: &[OrderRecord], existing: &HashSet<String>) -> DuplicateReport {
    let duplicate_count: usize = batch
        .iter()
        .filter(|row| is_duplicate(row, existing))
        .count();
    DuplicateReport {
        total: batch.len(),
        new_count: batch.len() - duplicate_count,
        duplicate_count,
    }
}

/// Returns true if the request must pause for caller confirmation
/// instead of writing. Only the dry-run mode ever pauses, and only when
/// at least one duplicate was found.
#[must_use]
pub const fn requires_confirmation(report: DuplicateReport, mode: ResolutionMode) -> bool {
    matches!(mode, ResolutionMode::DryRun) && report.duplicate_count > 0
}
