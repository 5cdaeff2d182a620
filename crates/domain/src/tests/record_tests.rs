// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    MarketName, OrderNumber, OrderRecord, SequenceCode, ShippingStatus, StatusTimestamps,
};

fn create_test_record() -> OrderRecord {
    OrderRecord {
        id: Some(42),
        order_number: OrderNumber::new("2026082901"),
        market_name: MarketName::new("Gmarket"),
        sequence_code: Some(SequenceCode::parse("GM1002").unwrap()),
        sheet_date: String::from("2026-08-29"),
        payment_date: None,
        recipient_name: String::from("Jordan Kim"),
        recipient_phone: Some(String::from("010-1234-5678")),
        recipient_address: Some(String::from("12 Harbor Lane")),
        option_name: String::from("Blue / L"),
        quantity: 2,
        seller_supply_price: 12000,
        settlement_amount: 0,
        refund_amount: 0,
        shipping_status: ShippingStatus::Registered,
        tracking_number: None,
        courier_company: None,
        shipped_date: None,
        memo: None,
        org_id: Some(7),
        sub_account_id: Some(3),
        created_by: Some(String::from("staff-1")),
        updated_by: None,
        created_at: Some(String::from("2026-08-29T09:00:00Z")),
        updated_at: None,
        milestones: StatusTimestamps::default(),
        is_deleted: false,
    }
}

#[test]
fn test_record_serde_round_trip() {
    let record: OrderRecord = create_test_record();
    let json: String = serde_json::to_string(&record).unwrap();
    let back: OrderRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_record_serializes_sequence_code_as_string() {
    let record: OrderRecord = create_test_record();
    let value: serde_json::Value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["sequence_code"], "GM1002");
    assert_eq!(value["shipping_status"], "registered");
}

#[test]
fn test_supply_total() {
    let record: OrderRecord = create_test_record();
    assert_eq!(record.supply_total(), 24000);
}

#[test]
fn test_minimal_record_deserializes_with_defaults() {
    let json: &str = r#"{
        "order_number": "A-1",
        "market_name": "Coupang",
        "sheet_date": "2026-08-29",
        "recipient_name": "Sam",
        "option_name": "Default",
        "quantity": 1,
        "seller_supply_price": 5000
    }"#;
    let record: OrderRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.shipping_status, ShippingStatus::Registered);
    assert_eq!(record.settlement_amount, 0);
    assert!(!record.is_deleted);
    assert!(record.sequence_code.is_none());
}
