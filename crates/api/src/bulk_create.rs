// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk order ingestion.
//!
//! Authorize, normalize, enrich, detect duplicates, then either pause
//! for confirmation or allocate sequence codes and write. Batch numbers
//! are reserved at the store only on the write path; a dry run peeks
//! without consuming one.

use crate::auth::{AuthenticatedActor, Capability, PermissionMatrix, authorize};
use crate::enrich::CatalogEnricher;
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    BatchInfo, BulkCreateRequest, BulkCreateResponse, MarketBatchDetail,
};
use bulk_orders::{
    BatchAllocator, DuplicateReport, NormalizeContext, ResolutionMode, candidate_identifiers,
    classify, is_duplicate, normalize_batch, requires_confirmation,
};
use bulk_orders_domain::{MarketName, OrderRecord};
use bulk_orders_store::OrderStore;
use std::collections::HashSet;
use tracing::info;

fn today() -> String {
    time::OffsetDateTime::now_utc().date().to_string()
}

/// Distinct non-empty markets among the selected rows, paired with the
/// sheet date of the first row that mentions them, in first-seen order.
fn market_dates(rows: &[OrderRecord], selected: &[bool]) -> Vec<(MarketName, String)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut markets: Vec<(MarketName, String)> = Vec::new();
    for (row, keep) in rows.iter().zip(selected) {
        if *keep && !row.market_name.is_empty() && seen.insert(row.market_name.value().to_string())
        {
            markets.push((row.market_name.clone(), row.sheet_date.clone()));
        }
    }
    markets
}

fn build_batch_info(batches: &[(MarketName, u32)]) -> BatchInfo {
    let current_batch: u32 = batches.iter().map(|(_, batch)| *batch).max().unwrap_or(1);
    BatchInfo {
        current_batch,
        market_batch_details: batches
            .iter()
            .map(|(market, batch)| MarketBatchDetail {
                market: market.value().to_string(),
                current_batch: *batch,
                next_sequence_start: batch * 1000 + 1,
            })
            .collect(),
        next_sequence_start: current_batch * 1000 + 1,
        sequence_format: String::from("letter prefix + 4-digit zero-padded number"),
    }
}

/// Ingests a batch of order rows.
///
/// Without an explicit duplicate-resolution flag the call is a dry run:
/// when collisions are found it reports them (with batch numbering
/// info) instead of writing, and the client re-submits with a flag.
///
/// # Errors
///
/// Returns an error for an unauthorized caller, an empty batch, an
/// invalid row, or a store failure. A duplicate confirmation is not an
/// error; the response carries `duplicates_detected` and batch info
/// instead of written rows.
pub async fn bulk_create(
    store: &dyn OrderStore,
    enricher: &dyn CatalogEnricher,
    matrix: &dyn PermissionMatrix,
    actor: &AuthenticatedActor,
    request: BulkCreateRequest,
) -> Result<BulkCreateResponse, ApiError> {
    authorize(actor, Capability::CreateOrders, matrix)?;

    if request.orders.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("orders"),
            message: String::from("order data is required"),
        });
    }

    let mode: ResolutionMode =
        ResolutionMode::from_flags(request.overwrite_duplicates, request.skip_duplicate_check);

    let context: NormalizeContext = NormalizeContext {
        creator_id: actor.id.clone(),
        scope: actor.scope.clone(),
        default_sheet_date: today(),
    };
    let drafts = request
        .orders
        .into_iter()
        .map(super::request_response::OrderRowInput::into_draft)
        .collect();
    let mut rows: Vec<OrderRecord> =
        normalize_batch(drafts, &context).map_err(translate_domain_error)?;

    enricher.enrich(&mut rows).await?;

    let existing: HashSet<String> = store
        .existing_order_numbers(&candidate_identifiers(&rows))
        .await?;
    let report: DuplicateReport = classify(&rows, &existing);
    let duplicate_flags: Vec<bool> = rows.iter().map(|row| is_duplicate(row, &existing)).collect();

    if requires_confirmation(report, mode) {
        // Peek numbering for the markets a confirmed write would touch,
        // falling back to every market when nothing is new.
        let new_flags: Vec<bool> = duplicate_flags.iter().map(|dup| !dup).collect();
        let mut markets: Vec<(MarketName, String)> = market_dates(&rows, &new_flags);
        if markets.is_empty() {
            let all_rows: Vec<bool> = vec![true; rows.len()];
            markets = market_dates(&rows, &all_rows);
        }
        let mut batches: Vec<(MarketName, u32)> = Vec::with_capacity(markets.len());
        for (market, sheet_date) in markets {
            let batch: u32 = store.peek_batch(&market, &sheet_date).await?;
            batches.push((market, batch));
        }
        info!(
            actor = %actor.id,
            duplicates = report.duplicate_count,
            "bulk ingestion paused for duplicate confirmation"
        );
        return Ok(BulkCreateResponse {
            success: true,
            duplicates_detected: Some(true),
            total: report.total,
            new_count: report.new_count,
            duplicate_count: report.duplicate_count,
            batch_info: Some(build_batch_info(&batches)),
            data: None,
        });
    }

    // Reserve one batch per market for the rows getting fresh codes.
    let new_flags: Vec<bool> = duplicate_flags.iter().map(|dup| !dup).collect();
    let mut allocator: BatchAllocator = BatchAllocator::new();
    for (market, sheet_date) in market_dates(&rows, &new_flags) {
        let batch: u32 = store.begin_batch(&market, &sheet_date).await?;
        allocator.seed_market(&market, batch);
    }

    let (mut new_rows, duplicate_rows): (Vec<OrderRecord>, Vec<OrderRecord>) = {
        let mut new_rows: Vec<OrderRecord> = Vec::new();
        let mut duplicate_rows: Vec<OrderRecord> = Vec::new();
        for (row, duplicate) in rows.into_iter().zip(&duplicate_flags) {
            if *duplicate {
                duplicate_rows.push(row);
            } else {
                new_rows.push(row);
            }
        }
        (new_rows, duplicate_rows)
    };
    allocator
        .assign_codes(&mut new_rows)
        .map_err(translate_domain_error)?;

    let written: Vec<OrderRecord> = match mode {
        ResolutionMode::Overwrite => {
            let mut all: Vec<OrderRecord> = new_rows;
            all.extend(duplicate_rows);
            store.upsert_orders(all).await?
        }
        ResolutionMode::SkipDuplicates | ResolutionMode::DryRun => {
            store.insert_orders(new_rows).await?
        }
    };

    info!(
        actor = %actor.id,
        total = report.total,
        new = report.new_count,
        duplicates = report.duplicate_count,
        written = written.len(),
        "bulk ingestion complete"
    );
    Ok(BulkCreateResponse {
        success: true,
        duplicates_detected: None,
        total: report.total,
        new_count: report.new_count,
        duplicate_count: report.duplicate_count,
        batch_info: None,
        data: Some(written),
    })
}
