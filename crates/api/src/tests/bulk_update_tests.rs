// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    DenyAllMatrix, FailingSink, create_row_input, create_scoped_staff, create_test_staff,
    seed_orders,
};
use crate::{ApiError, BulkUpdateOutcome, BulkUpdateRequest, StaticMatrix, bulk_update};
use bulk_orders_domain::{OrderRecord, ShippingStatus};
use bulk_orders_notify::{Audience, RecordingSink};
use bulk_orders_store::{MemoryOrderStore, OrderStore};
use serde_json::{Map, Value, json};

fn update_row(fields: Value) -> Map<String, Value> {
    match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

async fn seed_three(store: &MemoryOrderStore) -> Vec<OrderRecord> {
    seed_orders(
        store,
        vec![
            create_row_input("A-1", "Gmarket", None),
            create_row_input("A-2", "Gmarket", None),
            create_row_input("A-3", "Gmarket", None),
        ],
    )
    .await
}

#[tokio::test]
async fn test_empty_update_batch_is_rejected() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    let result = bulk_update(
        &store,
        &RecordingSink::new(),
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest { orders: Vec::new() },
    )
    .await;

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_denied_caller_is_rejected() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    let result = bulk_update(
        &store,
        &RecordingSink::new(),
        &DenyAllMatrix,
        &create_test_staff(),
        BulkUpdateRequest {
            orders: vec![update_row(json!({"id": 1, "memo": "x"}))],
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[tokio::test]
async fn test_every_row_lands_in_succeeded_or_failed() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    let seeded = seed_three(&store).await;
    let good_id: i64 = seeded[0].id.unwrap();

    let outcome: BulkUpdateOutcome = bulk_update(
        &store,
        &RecordingSink::new(),
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest {
            orders: vec![
                update_row(json!({"id": good_id, "memo": "checked"})),
                update_row(json!({"memo": "no id on this row"})),
                update_row(json!({"id": 40404, "memo": "no such row"})),
            ],
        },
    )
    .await
    .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.count, 1);
    assert_eq!(outcome.succeeded.len(), 1);
    assert_eq!(outcome.failed.len(), 2);
    assert_eq!(outcome.succeeded[0].memo, Some(String::from("checked")));
    assert!(outcome.failed.iter().any(|f| f.id.is_none()));
    assert!(outcome.failed.iter().any(|f| f.id == Some(40404)));
}

#[tokio::test]
async fn test_one_bad_row_does_not_block_the_others() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    let seeded = seed_three(&store).await;

    let outcome: BulkUpdateOutcome = bulk_update(
        &store,
        &RecordingSink::new(),
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest {
            orders: vec![
                update_row(json!({"id": seeded[0].id, "shipping_status": "preparing"})),
                update_row(json!({"id": seeded[1].id, "shipping_status": "launched"})),
                update_row(json!({"id": seeded[2].id, "shipping_status": "preparing"})),
            ],
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.succeeded.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    for row in &outcome.succeeded {
        assert_eq!(row.shipping_status, ShippingStatus::Preparing);
    }
}

#[tokio::test]
async fn test_status_changes_collapse_into_one_notification() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    store.register_business_name(3, "Harbor Goods Co.").await;
    let mut rows = vec![
        create_row_input("A-1", "Gmarket", None),
        create_row_input("A-2", "Gmarket", None),
        create_row_input("A-3", "Gmarket", None),
    ];
    for row in &mut rows {
        row.sub_account_id = Some(3);
    }
    let seeded = seed_orders(&store, rows).await;

    let sink: RecordingSink = RecordingSink::new();
    let orders: Vec<_> = seeded
        .iter()
        .map(|row| update_row(json!({"id": row.id, "shipping_status": "confirmed"})))
        .collect();
    let outcome: BulkUpdateOutcome = bulk_update(
        &store,
        &sink,
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest { orders },
    )
    .await
    .unwrap();

    assert!(outcome.success);
    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].audience, Audience::Operators);
    assert_eq!(delivered[0].order_count, 3);
    assert!(delivered[0].body.contains("Harbor Goods Co."));
}

#[tokio::test]
async fn test_non_status_updates_notify_nobody() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    let seeded = seed_three(&store).await;

    let sink: RecordingSink = RecordingSink::new();
    bulk_update(
        &store,
        &sink,
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest {
            orders: vec![update_row(
                json!({"id": seeded[0].id, "tracking_number": "TRK-1", "memo": "fragile"}),
            )],
        },
    )
    .await
    .unwrap();

    assert!(sink.delivered().is_empty());
}

#[tokio::test]
async fn test_silent_statuses_notify_nobody() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    let seeded = seed_three(&store).await;

    let sink: RecordingSink = RecordingSink::new();
    bulk_update(
        &store,
        &sink,
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest {
            orders: vec![update_row(
                json!({"id": seeded[0].id, "shipping_status": "preparing"}),
            )],
        },
    )
    .await
    .unwrap();

    assert!(sink.delivered().is_empty());
}

#[tokio::test]
async fn test_notification_failure_never_fails_the_update() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    let seeded = seed_three(&store).await;

    let outcome: BulkUpdateOutcome = bulk_update(
        &store,
        &FailingSink,
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest {
            orders: vec![update_row(
                json!({"id": seeded[0].id, "shipping_status": "shipped"}),
            )],
        },
    )
    .await
    .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.count, 1);
}

#[tokio::test]
async fn test_foreign_row_rejects_the_whole_request() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    let mut foreign = create_row_input("B-1", "Coupang", None);
    foreign.org_id = Some(8);
    let mut own = create_row_input("A-1", "Gmarket", None);
    own.org_id = Some(7);
    let seeded = seed_orders(&store, vec![own, foreign]).await;

    let result = bulk_update(
        &store,
        &RecordingSink::new(),
        &StaticMatrix,
        &create_scoped_staff(7),
        BulkUpdateRequest {
            orders: vec![
                update_row(json!({"id": seeded[0].id, "memo": "mine"})),
                update_row(json!({"id": seeded[1].id, "memo": "not mine"})),
            ],
        },
    )
    .await;

    assert!(matches!(result, Err(ApiError::ScopeViolation { .. })));
    // Nothing was written, not even the in-scope row.
    let untouched = store.get_order(seeded[0].id.unwrap()).await.unwrap().unwrap();
    assert!(untouched.memo.is_none());
}

#[tokio::test]
async fn test_settlement_notification_totals_the_group() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    store.register_business_name(3, "Harbor Goods Co.").await;
    let mut rows = vec![
        create_row_input("A-1", "Gmarket", None),
        create_row_input("A-2", "Gmarket", None),
    ];
    for row in &mut rows {
        row.sub_account_id = Some(3);
    }
    let seeded = seed_orders(&store, rows).await;

    // Record the settlement amounts first, then move the status in a
    // separate call so the amounts are on the rows when it changes.
    let amounts: Vec<_> = seeded
        .iter()
        .map(|row| update_row(json!({"id": row.id, "settlement_amount": 27000})))
        .collect();
    bulk_update(
        &store,
        &RecordingSink::new(),
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest { orders: amounts },
    )
    .await
    .unwrap();

    let sink: RecordingSink = RecordingSink::new();
    let orders: Vec<_> = seeded
        .iter()
        .map(|row| update_row(json!({"id": row.id, "shipping_status": "payment-complete"})))
        .collect();
    bulk_update(
        &store,
        &sink,
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest { orders },
    )
    .await
    .unwrap();

    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].audience, Audience::Seller);
    assert!(delivered[0].body.contains("54000"));
}

#[tokio::test]
async fn test_settlement_total_ignores_amounts_set_in_the_same_call() {
    let store: MemoryOrderStore = MemoryOrderStore::new();
    store.register_business_name(3, "Harbor Goods Co.").await;
    let mut row = create_row_input("A-1", "Gmarket", None);
    row.sub_account_id = Some(3);
    let seeded = seed_orders(&store, vec![row]).await;

    let sink: RecordingSink = RecordingSink::new();
    bulk_update(
        &store,
        &sink,
        &StaticMatrix,
        &create_test_staff(),
        BulkUpdateRequest {
            orders: vec![update_row(json!({
                "id": seeded[0].id,
                "shipping_status": "payment-complete",
                "settlement_amount": 27000,
            }))],
        },
    )
    .await
    .unwrap();

    // The amount written by the same call was not yet settled when the
    // status moved, so the notification quotes the prior amount.
    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert!(!delivered[0].body.contains("27000"));
}
