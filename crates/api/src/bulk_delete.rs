// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk soft deletion.
//!
//! Rows are flagged deleted, never physically removed; deleted rows
//! stop matching duplicate detection and disappear from fetches.

use crate::auth::{AuthenticatedActor, Capability, PermissionMatrix, authorize};
use crate::error::ApiError;
use crate::request_response::{BulkDeleteRequest, BulkDeleteResponse};
use bulk_orders_domain::{AccessScope, OrderRecord};
use bulk_orders_store::OrderStore;
use tracing::info;

/// Soft-deletes a set of order rows.
///
/// Identifiers that match nothing live are ignored; the returned count
/// is how many rows were actually flagged.
///
/// # Errors
///
/// Returns an error for an unauthorized caller, an empty id list, a
/// row outside the caller's organization, or a store failure.
pub async fn bulk_delete(
    store: &dyn OrderStore,
    matrix: &dyn PermissionMatrix,
    actor: &AuthenticatedActor,
    request: BulkDeleteRequest,
) -> Result<BulkDeleteResponse, ApiError> {
    authorize(actor, Capability::DeleteOrders, matrix)?;

    if request.ids.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("ids"),
            message: String::from("order ids are required"),
        });
    }

    if let AccessScope::Organization(_) = actor.scope {
        let targets: Vec<OrderRecord> = store.orders_by_ids(&request.ids).await?;
        if let Some(outside) = targets.iter().find(|row| !row.in_scope(&actor.scope)) {
            return Err(ApiError::ScopeViolation {
                message: format!(
                    "order '{}' belongs to another organization",
                    outside.order_number
                ),
            });
        }
    }

    let count: usize = store.soft_delete_orders(&request.ids).await?;
    info!(actor = %actor.id, requested = request.ids.len(), count, "bulk delete complete");
    Ok(BulkDeleteResponse {
        success: true,
        count,
    })
}
