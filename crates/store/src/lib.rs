// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod memory;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use memory::MemoryOrderStore;

use async_trait::async_trait;
use bulk_orders_domain::{MarketName, OrderRecord, ShippingStatus};
use std::collections::HashSet;

/// Allow-listed mutable fields for a bulk update.
///
/// Anything not named here (identifiers, provenance, the sequence code)
/// cannot be changed through the bulk update path, no matter what the
/// client sends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderChanges {
    /// New shipping status.
    pub shipping_status: Option<ShippingStatus>,
    /// New tracking number.
    pub tracking_number: Option<String>,
    /// New carrier name.
    pub courier_company: Option<String>,
    /// New ship date.
    pub shipped_date: Option<String>,
    /// New payment date.
    pub payment_date: Option<String>,
    /// New operator note.
    pub memo: Option<String>,
    /// New settlement amount.
    pub settlement_amount: Option<i64>,
    /// New refund amount.
    pub refund_amount: Option<i64>,
    /// New recipient name.
    pub recipient_name: Option<String>,
    /// New recipient phone.
    pub recipient_phone: Option<String>,
    /// New recipient address.
    pub recipient_address: Option<String>,
}

impl OrderChanges {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shipping_status.is_none()
            && self.tracking_number.is_none()
            && self.courier_company.is_none()
            && self.shipped_date.is_none()
            && self.payment_date.is_none()
            && self.memo.is_none()
            && self.settlement_amount.is_none()
            && self.refund_amount.is_none()
            && self.recipient_name.is_none()
            && self.recipient_phone.is_none()
            && self.recipient_address.is_none()
    }

    /// Applies the changes to a row, stamping update provenance and any
    /// newly reached status milestone.
    pub fn apply(&self, row: &mut OrderRecord, actor_id: &str, now: &str) {
        if let Some(status) = self.shipping_status {
            if row.shipping_status != status {
                row.milestones.record(status, now);
            }
            row.shipping_status = status;
        }
        if let Some(tracking_number) = &self.tracking_number {
            row.tracking_number = Some(tracking_number.clone());
        }
        if let Some(courier_company) = &self.courier_company {
            row.courier_company = Some(courier_company.clone());
        }
        if let Some(shipped_date) = &self.shipped_date {
            row.shipped_date = Some(shipped_date.clone());
        }
        if let Some(payment_date) = &self.payment_date {
            row.payment_date = Some(payment_date.clone());
        }
        if let Some(memo) = &self.memo {
            row.memo = Some(memo.clone());
        }
        if let Some(settlement_amount) = self.settlement_amount {
            row.settlement_amount = settlement_amount;
        }
        if let Some(refund_amount) = self.refund_amount {
            row.refund_amount = refund_amount;
        }
        if let Some(recipient_name) = &self.recipient_name {
            row.recipient_name = recipient_name.clone();
        }
        if let Some(recipient_phone) = &self.recipient_phone {
            row.recipient_phone = Some(recipient_phone.clone());
        }
        if let Some(recipient_address) = &self.recipient_address {
            row.recipient_address = Some(recipient_address.clone());
        }
        row.updated_by = Some(actor_id.to_string());
        row.updated_at = Some(now.to_string());
    }
}

/// Persistent order store behind the ingestion pipeline.
///
/// Implementations must serialize `begin_batch` so that two concurrent
/// ingestions of the same market and sheet date reserve distinct batch
/// numbers.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Returns which of `numbers` already exist on live (non-deleted) rows.
    async fn existing_order_numbers(
        &self,
        numbers: &HashSet<String>,
    ) -> Result<HashSet<String>, StoreError>;

    /// Returns the batch number the next ingestion for this market and
    /// sheet date would receive, without reserving it.
    async fn peek_batch(&self, market: &MarketName, sheet_date: &str) -> Result<u32, StoreError>;

    /// Atomically reserves and returns the next batch number for this
    /// market and sheet date.
    async fn begin_batch(&self, market: &MarketName, sheet_date: &str) -> Result<u32, StoreError>;

    /// Inserts new rows, assigning identifiers and creation timestamps.
    /// Returns the rows as persisted, in input order.
    async fn insert_orders(&self, rows: Vec<OrderRecord>) -> Result<Vec<OrderRecord>, StoreError>;

    /// Inserts rows, replacing any live row that shares an order number.
    /// Replaced rows keep their identifier, sequence code, and creation
    /// provenance. Returns the rows as persisted, in input order.
    async fn upsert_orders(&self, rows: Vec<OrderRecord>) -> Result<Vec<OrderRecord>, StoreError>;

    /// Fetches a single live row by identifier.
    async fn get_order(&self, id: i64) -> Result<Option<OrderRecord>, StoreError>;

    /// Fetches the live rows among `ids`, in no particular order.
    async fn orders_by_ids(&self, ids: &[i64]) -> Result<Vec<OrderRecord>, StoreError>;

    /// Applies allow-listed changes to one live row and returns the
    /// updated row.
    async fn update_order(
        &self,
        id: i64,
        changes: &OrderChanges,
        actor_id: &str,
    ) -> Result<OrderRecord, StoreError>;

    /// Soft-deletes the given rows. Returns how many rows were live and
    /// are now marked deleted.
    async fn soft_delete_orders(&self, ids: &[i64]) -> Result<usize, StoreError>;

    /// Resolves a seller sub-account to its business display name.
    async fn business_name(&self, sub_account_id: i64) -> Result<Option<String>, StoreError>;
}
