// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk order mutation.
//!
//! Rows are updated independently and concurrently; one bad row never
//! rolls back its neighbors. Every row lands in either `succeeded` or
//! `failed`, and status transitions detected across the updates are
//! collapsed into aggregated notifications after the writes finish.

use crate::auth::{AuthenticatedActor, Capability, PermissionMatrix, authorize};
use crate::error::ApiError;
use crate::request_response::{BulkUpdateOutcome, BulkUpdateRequest, RecordFailure};
use bulk_orders::{StatusTransition, detect_transition};
use bulk_orders_domain::{AccessScope, OrderRecord, ShippingStatus};
use bulk_orders_store::{OrderChanges, OrderStore, StoreError};
use futures::future::join_all;
use serde_json::{Map, Value};
use tracing::{info, warn};

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Extracts the row identifier and the allow-listed changes from one
/// free-form update map. Fields outside the allow-list are ignored.
fn parse_update_row(map: &Map<String, Value>) -> Result<(i64, OrderChanges), RecordFailure> {
    let id: i64 = map
        .get("id")
        .and_then(value_as_i64)
        .ok_or_else(|| RecordFailure {
            id: None,
            error: String::from("row is missing a usable 'id'"),
        })?;

    let mut changes: OrderChanges = OrderChanges::default();
    if let Some(value) = map.get("shipping_status") {
        let raw: String = value_as_string(value).unwrap_or_default();
        let status: ShippingStatus = raw.trim().parse().map_err(|_| RecordFailure {
            id: Some(id),
            error: format!("'{raw}' is not a recognized shipping status"),
        })?;
        changes.shipping_status = Some(status);
    }
    changes.tracking_number = map.get("tracking_number").and_then(value_as_string);
    changes.courier_company = map.get("courier_company").and_then(value_as_string);
    changes.shipped_date = map.get("shipped_date").and_then(value_as_string);
    changes.payment_date = map.get("payment_date").and_then(value_as_string);
    changes.memo = map.get("memo").and_then(value_as_string);
    changes.settlement_amount = map.get("settlement_amount").and_then(value_as_i64);
    changes.refund_amount = map.get("refund_amount").and_then(value_as_i64);
    changes.recipient_name = map.get("recipient_name").and_then(value_as_string);
    changes.recipient_phone = map.get("recipient_phone").and_then(value_as_string);
    changes.recipient_address = map.get("recipient_address").and_then(value_as_string);

    if changes.is_empty() {
        return Err(RecordFailure {
            id: Some(id),
            error: String::from("row carries no updatable fields"),
        });
    }
    Ok((id, changes))
}

async fn update_one(
    store: &dyn OrderStore,
    actor_id: &str,
    id: i64,
    changes: OrderChanges,
) -> Result<(OrderRecord, OrderRecord), RecordFailure> {
    // Snapshot immediately before this row's own update; transition
    // detection compares against it.
    let prior: OrderRecord = store
        .get_order(id)
        .await
        .map_err(|error| RecordFailure {
            id: Some(id),
            error: error.to_string(),
        })?
        .ok_or_else(|| RecordFailure {
            id: Some(id),
            error: StoreError::OrderNotFound(id).to_string(),
        })?;
    let updated: OrderRecord = store
        .update_order(id, &changes, actor_id)
        .await
        .map_err(|error| RecordFailure {
            id: Some(id),
            error: error.to_string(),
        })?;
    Ok((prior, updated))
}

/// Applies independent per-row mutations and dispatches aggregated
/// status-change notifications.
///
/// Notification delivery is best-effort: a channel failure is logged
/// and never fails the mutation that already happened.
///
/// # Errors
///
/// Returns an error for an unauthorized caller, an empty batch, a
/// scope violation, or a store failure during the scope pre-check.
/// Per-row failures are collected into the outcome instead.
pub async fn bulk_update(
    store: &dyn OrderStore,
    sink: &dyn bulk_orders_notify::NotificationSink,
    matrix: &dyn PermissionMatrix,
    actor: &AuthenticatedActor,
    request: BulkUpdateRequest,
) -> Result<BulkUpdateOutcome, ApiError> {
    authorize(actor, Capability::UpdateOrders, matrix)?;

    if request.orders.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("orders"),
            message: String::from("order data is required"),
        });
    }

    let mut failed: Vec<RecordFailure> = Vec::new();
    let mut updates: Vec<(i64, OrderChanges)> = Vec::new();
    for map in &request.orders {
        match parse_update_row(map) {
            Ok(update) => updates.push(update),
            Err(failure) => failed.push(failure),
        }
    }

    // Scope violations reject the whole request before any write.
    if let AccessScope::Organization(_) = actor.scope {
        let ids: Vec<i64> = updates.iter().map(|(id, _)| *id).collect();
        let targets: Vec<OrderRecord> = store.orders_by_ids(&ids).await?;
        if let Some(outside) = targets.iter().find(|row| !row.in_scope(&actor.scope)) {
            return Err(ApiError::ScopeViolation {
                message: format!(
                    "order '{}' belongs to another organization",
                    outside.order_number
                ),
            });
        }
    }

    let results = join_all(
        updates
            .into_iter()
            .map(|(id, changes)| update_one(store, &actor.id, id, changes)),
    )
    .await;

    let mut succeeded: Vec<OrderRecord> = Vec::new();
    let mut transitions: Vec<StatusTransition> = Vec::new();
    for result in results {
        match result {
            Ok((prior, updated)) => {
                if let Some(transition) = detect_transition(&prior, &updated) {
                    transitions.push(transition);
                }
                succeeded.push(updated);
            }
            Err(failure) => failed.push(failure),
        }
    }

    dispatch_notifications(store, sink, &transitions).await;

    info!(
        actor = %actor.id,
        updated = succeeded.len(),
        failed = failed.len(),
        transitions = transitions.len(),
        "bulk update complete"
    );
    Ok(BulkUpdateOutcome {
        success: failed.is_empty(),
        count: succeeded.len(),
        succeeded,
        failed,
    })
}

async fn dispatch_notifications(
    store: &dyn OrderStore,
    sink: &dyn bulk_orders_notify::NotificationSink,
    transitions: &[StatusTransition],
) {
    for group in bulk_orders_notify::group_transitions(transitions) {
        let Some(template) = bulk_orders_notify::template_for(group.key.status) else {
            continue;
        };
        let display_name: String = match group.key.sub_account_id {
            Some(sub_account_id) => store
                .business_name(sub_account_id)
                .await
                .ok()
                .flatten()
                .or_else(|| group.key.user_id.clone())
                .unwrap_or_else(|| String::from("unknown seller")),
            None => group
                .key
                .user_id
                .clone()
                .unwrap_or_else(|| String::from("unknown seller")),
        };
        let notification = bulk_orders_notify::build_notification(&group, template, &display_name);
        if let Err(error) = sink.deliver(notification).await {
            warn!(
                status = group.key.status.as_str(),
                orders = group.order_count,
                error = %error,
                "notification delivery failed"
            );
        }
    }
}
