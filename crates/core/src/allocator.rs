// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-market sequence number allocation.
//!
//! Each market in a write-eligible batch is seeded with a batch number
//! reserved at the store. Numbering for batch `b` starts at `b * 1000 + 1`
//! and increments in row order, so two markets in the same request both
//! start at `1001` for batch 1. Only rows classified as new are handed
//! to the allocator; overwritten rows keep their stored code.

use bulk_orders_domain::{DomainError, MarketName, OrderRecord, SequenceCode};
use std::collections::HashMap;

/// Stateful in-request allocator of market-scoped sequence numbers.
///
/// Seeding is the only store-coupled step; assignment afterwards is a
/// pure fold over the batch, so re-running it over the same rows yields
/// the same codes.
#[derive(Debug, Default)]
pub struct BatchAllocator {
    counters: HashMap<String, u32>,
    batches: HashMap<String, u32>,
}

impl BatchAllocator {
    /// Creates an empty allocator with no seeded markets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a market with the batch number reserved for it. Numbering
    /// for the market starts at `batch * 1000 + 1`.
    pub fn seed_market(&mut self, market: &MarketName, batch: u32) {
        self.counters
            .insert(market.value().to_string(), batch.saturating_mul(1000));
        self.batches.insert(market.value().to_string(), batch);
    }

    /// Returns the batch a market was seeded with, if it was seeded.
    #[must_use]
    pub fn batch_for_market(&self, market: &MarketName) -> Option<u32> {
        self.batches.get(market.value()).copied()
    }

    /// Returns the next number a seeded market would hand out.
    #[must_use]
    pub fn next_for_market(&self, market: &MarketName) -> Option<u32> {
        self.counters.get(market.value()).map(|n| n + 1)
    }

    /// Returns the highest batch across all seeded markets, or `None`
    /// when nothing was seeded.
    #[must_use]
    pub fn representative_batch(&self) -> Option<u32> {
        self.batches.values().copied().max()
    }

    /// Returns the seeded markets in no particular order.
    #[must_use]
    pub fn seeded_markets(&self) -> Vec<MarketName> {
        self.batches.keys().map(|k| MarketName::new(k)).collect()
    }

    /// Assigns sequence codes to `rows` in order.
    ///
    /// Rows with an empty market or an unseeded market are left without
    /// a code. The prefix comes from the row's template code when it has
    /// one, otherwise from the market's initial code; rows with neither
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a market's numbering runs past the end of its
    /// reserved batch range; batch `b` owns `b * 1000 + 1` through
    /// `b * 1000 + 999`, and the next thousand belongs to a batch that
    /// was never reserved.
    pub fn assign_codes(&mut self, rows: &mut [OrderRecord]) -> Result<(), DomainError> {
        for row in rows.iter_mut() {
            if row.market_name.is_empty() {
                continue;
            }
            let Some(batch) = self.batches.get(row.market_name.value()).copied() else {
                continue;
            };
            let Some(counter) = self.counters.get_mut(row.market_name.value()) else {
                continue;
            };
            let prefix: Option<String> = row
                .sequence_code
                .as_ref()
                .map(|code| code.prefix().to_string())
                .or_else(|| row.market_name.initial_code());
            let Some(prefix) = prefix else {
                row.sequence_code = None;
                continue;
            };
            let next: u32 = *counter + 1;
            if next > batch.saturating_mul(1000) + 999 {
                return Err(DomainError::SequenceNumberOutOfRange { number: next });
            }
            row.sequence_code = Some(SequenceCode::new(&prefix, next)?);
            *counter = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use bulk_orders_domain::{OrderNumber, OrderRecord, ShippingStatus, StatusTimestamps};

    fn create_test_row(market: &str, template: Option<&str>) -> OrderRecord {
        OrderRecord {
            id: None,
            order_number: OrderNumber::new("X-1"),
            market_name: MarketName::new(market),
            sequence_code: template.map(|t| SequenceCode::parse(t).unwrap()),
            sheet_date: String::from("2026-08-29"),
            payment_date: None,
            recipient_name: String::from("Sam"),
            recipient_phone: None,
            recipient_address: None,
            option_name: String::from("Default"),
            quantity: 1,
            seller_supply_price: 1000,
            settlement_amount: 0,
            refund_amount: 0,
            shipping_status: ShippingStatus::Registered,
            tracking_number: None,
            courier_company: None,
            shipped_date: None,
            memo: None,
            org_id: None,
            sub_account_id: None,
            created_by: None,
            updated_by: None,
            created_at: None,
            updated_at: None,
            milestones: StatusTimestamps::default(),
            is_deleted: false,
        }
    }

    #[test]
    fn test_each_market_starts_at_batch_boundary_plus_one() {
        let gmarket: MarketName = MarketName::new("Gmarket");
        let coupang: MarketName = MarketName::new("Coupang");

        let mut allocator: BatchAllocator = BatchAllocator::new();
        allocator.seed_market(&gmarket, 1);
        allocator.seed_market(&coupang, 1);

        let mut rows: Vec<OrderRecord> = vec![
            create_test_row("Gmarket", Some("GM0000")),
            create_test_row("Coupang", Some("CP0000")),
            create_test_row("Gmarket", Some("GM0000")),
        ];
        allocator.assign_codes(&mut rows).unwrap();

        assert_eq!(rows[0].sequence_code.as_ref().unwrap().format(), "GM1001");
        assert_eq!(rows[1].sequence_code.as_ref().unwrap().format(), "CP1001");
        assert_eq!(rows[2].sequence_code.as_ref().unwrap().format(), "GM1002");
    }

    #[test]
    fn test_unseeded_or_empty_market_gets_no_code() {
        let mut allocator: BatchAllocator = BatchAllocator::new();
        allocator.seed_market(&MarketName::new("Gmarket"), 1);

        let mut rows: Vec<OrderRecord> = vec![
            create_test_row("", None),
            create_test_row("Naver", Some("NV0000")),
        ];
        allocator.assign_codes(&mut rows).unwrap();

        assert!(rows[0].sequence_code.is_none());
        // Naver was never seeded, so its template stays untouched.
        assert_eq!(rows[1].sequence_code.as_ref().unwrap().format(), "NV0000");
    }

    #[test]
    fn test_prefix_falls_back_to_market_initial() {
        let mut allocator: BatchAllocator = BatchAllocator::new();
        allocator.seed_market(&MarketName::new("Gmarket"), 2);

        let mut rows: Vec<OrderRecord> = vec![create_test_row("Gmarket", None)];
        allocator.assign_codes(&mut rows).unwrap();

        assert_eq!(rows[0].sequence_code.as_ref().unwrap().format(), "GM2001");
    }

    #[test]
    fn test_assignment_is_stable_for_identical_input() {
        let market: MarketName = MarketName::new("Gmarket");
        let build = || {
            let mut allocator: BatchAllocator = BatchAllocator::new();
            allocator.seed_market(&market, 3);
            let mut rows: Vec<OrderRecord> = vec![
                create_test_row("Gmarket", Some("GM0000")),
                create_test_row("Gmarket", Some("GM0000")),
            ];
            allocator.assign_codes(&mut rows).unwrap();
            rows
        };

        let first: Vec<OrderRecord> = build();
        let second: Vec<OrderRecord> = build();
        assert_eq!(first, second);
        assert_eq!(first[1].sequence_code.as_ref().unwrap().format(), "GM3002");
    }

    #[test]
    fn test_overflow_of_code_space_is_an_error() {
        let market: MarketName = MarketName::new("Gmarket");
        let mut allocator: BatchAllocator = BatchAllocator::new();
        allocator.seed_market(&market, 9);

        // Batch 9 spans 9001..=9999; the thousandth row would need 10000.
        let mut rows: Vec<OrderRecord> = (0..999)
            .map(|_| create_test_row("Gmarket", Some("GM0000")))
            .collect();
        assert!(allocator.assign_codes(&mut rows).is_ok());

        let mut overflow: Vec<OrderRecord> = vec![create_test_row("Gmarket", Some("GM0000"))];
        assert!(allocator.assign_codes(&mut overflow).is_err());
    }

    #[test]
    fn test_numbering_never_crosses_into_the_next_batch_range() {
        let market: MarketName = MarketName::new("Gmarket");
        let mut allocator: BatchAllocator = BatchAllocator::new();
        allocator.seed_market(&market, 1);

        // Batch 1 owns 1001..=1999; 2000 belongs to an unreserved batch.
        let mut rows: Vec<OrderRecord> = (0..999)
            .map(|_| create_test_row("Gmarket", Some("GM0000")))
            .collect();
        assert!(allocator.assign_codes(&mut rows).is_ok());
        assert_eq!(rows[998].sequence_code.as_ref().unwrap().format(), "GM1999");

        let mut spill: Vec<OrderRecord> = vec![create_test_row("Gmarket", Some("GM0000"))];
        assert_eq!(
            allocator.assign_codes(&mut spill),
            Err(DomainError::SequenceNumberOutOfRange { number: 2000 })
        );
    }
}
