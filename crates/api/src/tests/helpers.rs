// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AuthenticatedActor, BulkCreateRequest, NoopEnricher, OrderRowInput, PermissionMatrix, Role,
    StaticMatrix, bulk_create,
};
use async_trait::async_trait;
use bulk_orders_domain::{AccessScope, OrderRecord};
use bulk_orders_notify::{DispatchError, Notification, NotificationSink};
use bulk_orders_store::MemoryOrderStore;

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(
        String::from("admin-1"),
        Role::Admin,
        AccessScope::Unrestricted,
    )
}

pub fn create_test_staff() -> AuthenticatedActor {
    AuthenticatedActor::new(
        String::from("staff-1"),
        Role::Staff,
        AccessScope::Unrestricted,
    )
}

pub fn create_scoped_staff(org_id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(
        format!("staff-org-{org_id}"),
        Role::Staff,
        AccessScope::Organization(org_id),
    )
}

pub fn create_row_input(order_number: &str, market: &str, template: Option<&str>) -> OrderRowInput {
    OrderRowInput {
        order_number: order_number.to_string(),
        market_name: market.to_string(),
        recipient_name: String::from("Jordan Kim"),
        option_name: String::from("Blue / L"),
        quantity: Some(2),
        seller_supply_price: Some(12000),
        sequence_code: template.map(String::from),
        ..OrderRowInput::default()
    }
}

/// Ingests rows through the real create path and returns them as stored.
pub async fn seed_orders(store: &MemoryOrderStore, rows: Vec<OrderRowInput>) -> Vec<OrderRecord> {
    let response = bulk_create(
        store,
        &NoopEnricher,
        &StaticMatrix,
        &create_test_staff(),
        BulkCreateRequest {
            orders: rows,
            overwrite_duplicates: false,
            skip_duplicate_check: false,
        },
    )
    .await
    .unwrap();
    response.data.unwrap()
}

/// Matrix that denies everything, for authorization failure paths.
pub struct DenyAllMatrix;

impl PermissionMatrix for DenyAllMatrix {
    fn allows(&self, _role: Role, _capability: crate::Capability) -> bool {
        false
    }
}

/// Sink whose channel always fails, for best-effort delivery paths.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn deliver(&self, _notification: Notification) -> Result<(), DispatchError> {
        Err(DispatchError::ChannelUnavailable(String::from(
            "connection refused",
        )))
    }
}
