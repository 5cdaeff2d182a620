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
    clippy::all
)]

//! Status-change notification aggregation and dispatch.
//!
//! Bulk updates can move hundreds of rows at once; recipients get one
//! aggregated notification per (seller, sub-account, status) group, not
//! one per row. Which statuses notify whom is a data-driven table, so
//! adding a notified status is a table entry, not a new code path.

use async_trait::async_trait;
use bulk_orders::StatusTransition;
use bulk_orders_domain::ShippingStatus;
use std::sync::Mutex;
use thiserror::Error;

/// Who an aggregated notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Back-office operators watching seller activity.
    Operators,
    /// The seller whose orders moved.
    Seller,
}

/// Identity of one aggregation bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    /// Seller-side user the orders belong to.
    pub user_id: Option<String>,
    /// Seller sub-account, used to resolve the business display name.
    pub sub_account_id: Option<i64>,
    /// Status the orders arrived at.
    pub status: ShippingStatus,
}

/// One aggregated bucket of transitions sharing a group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationGroup {
    /// The bucket identity.
    pub key: GroupKey,
    /// How many orders moved.
    pub order_count: usize,
    /// Sum of settlement amounts across the bucket.
    pub settlement_total: i64,
    /// Sum of refund amounts across the bucket.
    pub refund_total: i64,
    /// Sum of supply totals across the bucket.
    pub supply_total: i64,
    /// The order identifiers in the bucket, in update order.
    pub order_numbers: Vec<String>,
}

/// Collapses transitions into one group per (user, sub-account, status),
/// preserving first-seen order.
#[must_use]
pub fn group_transitions(transitions: &[StatusTransition]) -> Vec<NotificationGroup> {
    let mut groups: Vec<NotificationGroup> = Vec::new();
    for transition in transitions {
        let key: GroupKey = GroupKey {
            user_id: transition.user_id.clone(),
            sub_account_id: transition.sub_account_id,
            status: transition.to,
        };
        let index: usize = groups
            .iter()
            .position(|g| g.key == key)
            .unwrap_or_else(|| {
                groups.push(NotificationGroup {
                    key,
                    order_count: 0,
                    settlement_total: 0,
                    refund_total: 0,
                    supply_total: 0,
                    order_numbers: Vec::new(),
                });
                groups.len() - 1
            });
        let group: &mut NotificationGroup = &mut groups[index];
        group.order_count += 1;
        group.settlement_total += transition.settlement_amount;
        group.refund_total += transition.refund_amount;
        group.supply_total += transition.supply_total;
        group
            .order_numbers
            .push(transition.order_number.value().to_string());
    }
    groups
}

/// How to render an aggregated notification for one status.
#[derive(Debug, Clone, Copy)]
pub struct NotificationTemplate {
    /// Who receives it.
    pub audience: Audience,
    /// Short subject line.
    pub title: &'static str,
    /// Renders the body given the group and the resolved display name.
    pub body: fn(&NotificationGroup, &str) -> String,
}

fn confirmed_body(group: &NotificationGroup, display_name: &str) -> String {
    format!(
        "{display_name} confirmed {} orders (supply total {})",
        group.order_count, group.supply_total
    )
}

fn cancel_requested_body(group: &NotificationGroup, display_name: &str) -> String {
    format!(
        "{display_name} requested cancellation of {} orders",
        group.order_count
    )
}

fn payment_complete_body(group: &NotificationGroup, display_name: &str) -> String {
    format!(
        "Settlement paid for {} orders of {display_name}: total {}",
        group.order_count, group.settlement_total
    )
}

fn shipped_body(group: &NotificationGroup, display_name: &str) -> String {
    format!("{} orders of {display_name} have shipped", group.order_count)
}

fn cancelled_body(group: &NotificationGroup, display_name: &str) -> String {
    format!(
        "Cancellation approved for {} orders of {display_name}",
        group.order_count
    )
}

/// Which statuses notify whom. Statuses absent from this table are
/// silent.
const DISPATCH_TABLE: &[(ShippingStatus, NotificationTemplate)] = &[
    (
        ShippingStatus::Confirmed,
        NotificationTemplate {
            audience: Audience::Operators,
            title: "Orders confirmed",
            body: confirmed_body,
        },
    ),
    (
        ShippingStatus::CancelRequested,
        NotificationTemplate {
            audience: Audience::Operators,
            title: "Cancellation requested",
            body: cancel_requested_body,
        },
    ),
    (
        ShippingStatus::PaymentComplete,
        NotificationTemplate {
            audience: Audience::Seller,
            title: "Settlement paid",
            body: payment_complete_body,
        },
    ),
    (
        ShippingStatus::Shipped,
        NotificationTemplate {
            audience: Audience::Seller,
            title: "Orders shipped",
            body: shipped_body,
        },
    ),
    (
        ShippingStatus::Cancelled,
        NotificationTemplate {
            audience: Audience::Seller,
            title: "Cancellation approved",
            body: cancelled_body,
        },
    ),
];

/// Looks up the template for a status, if it notifies anyone.
#[must_use]
pub fn template_for(status: ShippingStatus) -> Option<&'static NotificationTemplate> {
    DISPATCH_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == status)
        .map(|(_, template)| template)
}

/// A rendered notification ready for a delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Who receives it.
    pub audience: Audience,
    /// Seller-side user to address, for seller-facing notifications.
    pub recipient: Option<String>,
    /// Short subject line.
    pub title: String,
    /// Rendered message body.
    pub body: String,
    /// How many orders the notification covers.
    pub order_count: usize,
    /// The covered order identifiers.
    pub order_numbers: Vec<String>,
}

/// Renders a group through its template.
#[must_use]
pub fn build_notification(
    group: &NotificationGroup,
    template: &NotificationTemplate,
    display_name: &str,
) -> Notification {
    Notification {
        audience: template.audience,
        recipient: match template.audience {
            Audience::Operators => None,
            Audience::Seller => group.key.user_id.clone(),
        },
        title: template.title.to_string(),
        body: (template.body)(group, display_name),
        order_count: group.order_count,
        order_numbers: group.order_numbers.clone(),
    }
}

/// Errors a delivery channel can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The channel accepted the connection but rejected the payload.
    #[error("delivery channel rejected notification: {0}")]
    ChannelRejected(String),
    /// The channel could not be reached at all.
    #[error("delivery channel unavailable: {0}")]
    ChannelUnavailable(String),
}

/// Delivery channel for rendered notifications.
///
/// Delivery is best-effort; callers log failures and carry on, since a
/// completed mutation must never be rolled back over a notification.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel rejected or never received the
    /// notification.
    async fn deliver(&self, notification: Notification) -> Result<(), DispatchError>;
}

/// Sink that records everything it is given. Used by the development
/// server and the test suites.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything delivered so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notification: Notification) -> Result<(), DispatchError> {
        self.delivered
            .lock()
            .map_err(|_| DispatchError::ChannelUnavailable(String::from("sink lock poisoned")))?
            .push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
