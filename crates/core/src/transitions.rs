// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Status transition detection for update notifications.
//!
//! A transition exists when the stored status before a row's update
//! differs from the status after it. Updates that touch other fields
//! without moving the status produce no transition.

use bulk_orders_domain::{OrderNumber, OrderRecord, ShippingStatus};

/// One observed status change on one order row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// Caller who originally ingested the row, used to address
    /// seller-facing notifications.
    pub user_id: Option<String>,
    /// Organization the row belongs to.
    pub org_id: Option<i64>,
    /// Seller sub-account the row belongs to.
    pub sub_account_id: Option<i64>,
    /// The order that moved.
    pub order_number: OrderNumber,
    /// Status before the update.
    pub from: ShippingStatus,
    /// Status after the update.
    pub to: ShippingStatus,
    /// Settlement amount as it stood before the update.
    pub settlement_amount: i64,
    /// Refund amount as it stood before the update.
    pub refund_amount: i64,
    /// Supply price times quantity as they stood before the update.
    pub supply_total: i64,
}

/// Compares the snapshots taken around one row's update and reports the
/// transition, if the status actually moved.
///
/// Monetary amounts are taken from the prior snapshot, so an update that
/// moves the status and rewrites the amounts in one call reports the
/// amounts the order held when the status changed, not the new ones.
///
/// Rows with no recorded creator produce no transition; there is nobody
/// to address the resulting notification to.
#[must_use]
pub fn detect_transition(prior: &OrderRecord, updated: &OrderRecord) -> Option<StatusTransition> {
    if prior.shipping_status == updated.shipping_status || updated.created_by.is_none() {
        return None;
    }
    Some(StatusTransition {
        user_id: updated.created_by.clone(),
        org_id: updated.org_id,
        sub_account_id: updated.sub_account_id,
        order_number: updated.order_number.clone(),
        from: prior.shipping_status,
        to: updated.shipping_status,
        settlement_amount: prior.settlement_amount,
        refund_amount: prior.refund_amount,
        supply_total: prior.supply_total(),
    })
}
