// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory order store.
//!
//! Backs the server in development and the test suites everywhere.
//! All mutation runs under one write lock, which is what makes batch
//! reservation atomic.

use crate::error::StoreError;
use crate::{OrderChanges, OrderStore};
use async_trait::async_trait;
use bulk_orders_domain::{MarketName, OrderRecord};
use std::collections::{HashMap, HashSet};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::RwLock;
use tracing::debug;

fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[derive(Debug, Default)]
struct Inner {
    rows: HashMap<i64, OrderRecord>,
    /// Live (non-deleted) rows indexed by non-empty order number.
    ids_by_number: HashMap<String, i64>,
    /// Last batch number reserved per (market, sheet date).
    batch_counters: HashMap<(String, String), u32>,
    business_names: HashMap<i64, String>,
    next_id: i64,
}

impl Inner {
    /// Batch derived from what is actually stored for a market and date.
    fn derived_batch(&self, market: &MarketName, sheet_date: &str) -> u32 {
        let max_sequence: Option<u32> = self
            .rows
            .values()
            .filter(|row| {
                !row.is_deleted
                    && row.market_name == *market
                    && row.sheet_date == sheet_date
            })
            .filter_map(|row| row.sequence_code.as_ref().map(|code| code.number()))
            .max();
        max_sequence.map_or(1, |max| max / 1000 + 1)
    }

    fn next_batch(&self, market: &MarketName, sheet_date: &str) -> u32 {
        let derived: u32 = self.derived_batch(market, sheet_date);
        let key: (String, String) = (market.value().to_string(), sheet_date.to_string());
        let reserved: u32 = self
            .batch_counters
            .get(&key)
            .map_or(0, |counter| counter + 1);
        derived.max(reserved)
    }

    fn insert_row(&mut self, mut row: OrderRecord, now: &str) -> OrderRecord {
        self.next_id += 1;
        row.id = Some(self.next_id);
        row.created_at = Some(now.to_string());
        row.updated_at = Some(now.to_string());
        if !row.order_number.is_empty() {
            self.ids_by_number
                .insert(row.order_number.value().to_string(), self.next_id);
        }
        self.rows.insert(self.next_id, row.clone());
        row
    }
}

/// Thread-safe in-memory implementation of [`OrderStore`].
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    inner: RwLock<Inner>,
}

impl MemoryOrderStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a seller sub-account's business display name.
    pub async fn register_business_name(&self, sub_account_id: i64, name: &str) {
        let mut inner = self.inner.write().await;
        inner.business_names.insert(sub_account_id, name.to_string());
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn existing_order_numbers(
        &self,
        numbers: &HashSet<String>,
    ) -> Result<HashSet<String>, StoreError> {
        let inner = self.inner.read().await;
        Ok(numbers
            .iter()
            .filter(|number| inner.ids_by_number.contains_key(*number))
            .cloned()
            .collect())
    }

    async fn peek_batch(&self, market: &MarketName, sheet_date: &str) -> Result<u32, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.next_batch(market, sheet_date))
    }

    async fn begin_batch(&self, market: &MarketName, sheet_date: &str) -> Result<u32, StoreError> {
        let mut inner = self.inner.write().await;
        let batch: u32 = inner.next_batch(market, sheet_date);
        inner.batch_counters.insert(
            (market.value().to_string(), sheet_date.to_string()),
            batch,
        );
        debug!(market = market.value(), sheet_date, batch, "reserved batch");
        Ok(batch)
    }

    async fn insert_orders(&self, rows: Vec<OrderRecord>) -> Result<Vec<OrderRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        // A non-empty identifier must be unique across what is stored
        // and within the incoming batch itself; nothing is written when
        // either check fails.
        let mut incoming: HashSet<&str> = HashSet::new();
        for row in &rows {
            if row.order_number.is_empty() {
                continue;
            }
            let number: &str = row.order_number.value();
            if inner.ids_by_number.contains_key(number) || !incoming.insert(number) {
                return Err(StoreError::DuplicateOrderNumber(number.to_string()));
            }
        }
        let now: String = now_iso();
        let inserted: Vec<OrderRecord> = rows
            .into_iter()
            .map(|row| inner.insert_row(row, &now))
            .collect();
        debug!(count = inserted.len(), "inserted order rows");
        Ok(inserted)
    }

    async fn upsert_orders(&self, rows: Vec<OrderRecord>) -> Result<Vec<OrderRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        let now: String = now_iso();
        let mut persisted: Vec<OrderRecord> = Vec::with_capacity(rows.len());
        for row in rows {
            let existing_id: Option<i64> = if row.order_number.is_empty() {
                None
            } else {
                inner.ids_by_number.get(row.order_number.value()).copied()
            };
            if let Some(id) = existing_id {
                let Some(stored) = inner.rows.get_mut(&id) else {
                    return Err(StoreError::Other(format!(
                        "index points at missing row {id}"
                    )));
                };
                let mut replacement: OrderRecord = row;
                replacement.id = stored.id;
                replacement.sequence_code = stored.sequence_code.clone();
                replacement.created_at = stored.created_at.clone();
                replacement.created_by = stored.created_by.clone();
                replacement.updated_at = Some(now.clone());
                *stored = replacement.clone();
                persisted.push(replacement);
            } else {
                persisted.push(inner.insert_row(row, &now));
            }
        }
        debug!(count = persisted.len(), "upserted order rows");
        Ok(persisted)
    }

    async fn get_order(&self, id: i64) -> Result<Option<OrderRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .get(&id)
            .filter(|row| !row.is_deleted)
            .cloned())
    }

    async fn orders_by_ids(&self, ids: &[i64]) -> Result<Vec<OrderRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.rows.get(id))
            .filter(|row| !row.is_deleted)
            .cloned()
            .collect())
    }

    async fn update_order(
        &self,
        id: i64,
        changes: &OrderChanges,
        actor_id: &str,
    ) -> Result<OrderRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let now: String = now_iso();
        let Some(row) = inner.rows.get_mut(&id).filter(|row| !row.is_deleted) else {
            return Err(StoreError::OrderNotFound(id));
        };
        changes.apply(row, actor_id, &now);
        Ok(row.clone())
    }

    async fn soft_delete_orders(&self, ids: &[i64]) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let now: String = now_iso();
        let mut deleted: usize = 0;
        let mut freed_numbers: Vec<String> = Vec::new();
        for id in ids {
            if let Some(row) = inner.rows.get_mut(id) {
                if !row.is_deleted {
                    row.is_deleted = true;
                    row.updated_at = Some(now.clone());
                    if !row.order_number.is_empty() {
                        freed_numbers.push(row.order_number.value().to_string());
                    }
                    deleted += 1;
                }
            }
        }
        for number in freed_numbers {
            inner.ids_by_number.remove(&number);
        }
        debug!(count = deleted, "soft-deleted order rows");
        Ok(deleted)
    }

    async fn business_name(&self, sub_account_id: i64) -> Result<Option<String>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.business_names.get(&sub_account_id).cloned())
    }
}
