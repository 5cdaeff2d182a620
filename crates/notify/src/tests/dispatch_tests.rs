// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Audience, GroupKey, Notification, NotificationGroup, NotificationSink, RecordingSink,
    build_notification, template_for,
};
use bulk_orders_domain::ShippingStatus;

fn create_test_group(status: ShippingStatus) -> NotificationGroup {
    NotificationGroup {
        key: GroupKey {
            user_id: Some(String::from("seller-1")),
            sub_account_id: Some(3),
            status,
        },
        order_count: 2,
        settlement_total: 54000,
        refund_total: 0,
        supply_total: 24000,
        order_numbers: vec![String::from("A-1"), String::from("A-2")],
    }
}

#[test]
fn test_seller_actions_notify_operators() {
    let confirmed = template_for(ShippingStatus::Confirmed).unwrap();
    assert_eq!(confirmed.audience, Audience::Operators);

    let cancel_requested = template_for(ShippingStatus::CancelRequested).unwrap();
    assert_eq!(cancel_requested.audience, Audience::Operators);
}

#[test]
fn test_operator_actions_notify_the_seller() {
    for status in [
        ShippingStatus::PaymentComplete,
        ShippingStatus::Shipped,
        ShippingStatus::Cancelled,
    ] {
        let template = template_for(status).unwrap();
        assert_eq!(template.audience, Audience::Seller);
    }
}

#[test]
fn test_silent_statuses_have_no_template() {
    assert!(template_for(ShippingStatus::Registered).is_none());
    assert!(template_for(ShippingStatus::Preparing).is_none());
    assert!(template_for(ShippingStatus::Refunded).is_none());
}

#[test]
fn test_settlement_notification_carries_the_total() {
    let group: NotificationGroup = create_test_group(ShippingStatus::PaymentComplete);
    let template = template_for(ShippingStatus::PaymentComplete).unwrap();

    let notification: Notification = build_notification(&group, template, "Harbor Goods Co.");
    assert_eq!(notification.audience, Audience::Seller);
    assert_eq!(notification.recipient, Some(String::from("seller-1")));
    assert_eq!(notification.order_count, 2);
    assert!(notification.body.contains("54000"));
    assert!(notification.body.contains("Harbor Goods Co."));
}

#[test]
fn test_operator_notification_has_no_single_recipient() {
    let group: NotificationGroup = create_test_group(ShippingStatus::Confirmed);
    let template = template_for(ShippingStatus::Confirmed).unwrap();

    let notification: Notification = build_notification(&group, template, "Harbor Goods Co.");
    assert_eq!(notification.audience, Audience::Operators);
    assert!(notification.recipient.is_none());
    assert!(notification.body.contains("24000"));
}

#[tokio::test]
async fn test_recording_sink_keeps_delivery_order() {
    let sink: RecordingSink = RecordingSink::new();
    let group: NotificationGroup = create_test_group(ShippingStatus::Shipped);
    let template = template_for(ShippingStatus::Shipped).unwrap();

    let first: Notification = build_notification(&group, template, "First Co.");
    let second: Notification = build_notification(&group, template, "Second Co.");
    sink.deliver(first.clone()).await.unwrap();
    sink.deliver(second.clone()).await.unwrap();

    assert_eq!(sink.delivered(), vec![first, second]);
}
