// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::NormalizeContext;
use bulk_orders_domain::{AccessScope, OrderDraft, OrderRecord};

pub fn create_test_context() -> NormalizeContext {
    NormalizeContext {
        creator_id: String::from("staff-1"),
        scope: AccessScope::Unrestricted,
        default_sheet_date: String::from("2026-08-29"),
    }
}

pub fn create_test_draft(order_number: &str, market: &str) -> OrderDraft {
    OrderDraft {
        order_number: order_number.to_string(),
        market_name: market.to_string(),
        recipient_name: String::from("Jordan Kim"),
        option_name: String::from("Blue / L"),
        quantity: Some(2),
        seller_supply_price: Some(12000),
        ..OrderDraft::default()
    }
}

pub fn create_test_record(order_number: &str, market: &str) -> OrderRecord {
    crate::normalize_draft(create_test_draft(order_number, market), &create_test_context())
        .unwrap()
}
