// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core order types shared across the ingestion pipeline.

use crate::sequence::SequenceCode;
use crate::status::ShippingStatus;
use serde::{Deserialize, Serialize};

/// Marketplace order identifier as supplied by the source spreadsheet.
///
/// Spreadsheet exports hand these over in inconsistent shapes, so the
/// constructor trims whitespace. An empty identifier is permitted; such
/// rows are always treated as new during duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber {
    value: String,
}

impl OrderNumber {
    /// Creates an order number, trimming surrounding whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the normalized identifier string.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true if the source row carried no identifier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Name of the marketplace an order originated from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketName {
    value: String,
}

impl MarketName {
    /// Creates a market name, trimming surrounding whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the normalized market name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true if the source row carried no market name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns the uppercased leading alphabetic run of the name, used
    /// as a sequence code prefix when no template code is available.
    #[must_use]
    pub fn initial_code(&self) -> Option<String> {
        let run: String = self
            .value
            .chars()
            .take_while(|c| c.is_alphabetic())
            .take(2)
            .collect();
        if run.is_empty() {
            None
        } else {
            Some(run.to_uppercase())
        }
    }
}

impl std::fmt::Display for MarketName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Organization visibility boundary for a caller.
///
/// Privileged back-office operators see every organization; everyone
/// else is pinned to exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// Caller may read and mutate orders in any organization.
    Unrestricted,
    /// Caller may only touch orders belonging to this organization.
    Organization(i64),
}

impl AccessScope {
    /// Returns true if a record owned by `org_id` is visible to this scope.
    #[must_use]
    pub const fn permits(&self, org_id: Option<i64>) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Organization(own) => matches!(org_id, Some(other) if other == *own),
        }
    }

    /// Returns the organization this scope is pinned to, if any.
    #[must_use]
    pub const fn organization(&self) -> Option<i64> {
        match self {
            Self::Unrestricted => None,
            Self::Organization(id) => Some(*id),
        }
    }
}

/// Timestamps recorded when an order first reaches each status milestone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimestamps {
    /// When the seller confirmed the order.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confirmed_at: Option<String>,
    /// When settlement payment was recorded.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_completed_at: Option<String>,
    /// When the order shipped.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shipped_at: Option<String>,
    /// When the order was cancelled.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cancelled_at: Option<String>,
    /// When the refund was issued.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refunded_at: Option<String>,
}

impl StatusTimestamps {
    /// Records the milestone timestamp for `status`, if it has one.
    ///
    /// The first recorded timestamp for a milestone wins; re-entering a
    /// status does not move it.
    pub fn record(&mut self, status: ShippingStatus, at: &str) {
        let slot: Option<&mut Option<String>> = match status {
            ShippingStatus::Confirmed => Some(&mut self.confirmed_at),
            ShippingStatus::PaymentComplete => Some(&mut self.payment_completed_at),
            ShippingStatus::Shipped => Some(&mut self.shipped_at),
            ShippingStatus::Cancelled => Some(&mut self.cancelled_at),
            ShippingStatus::Refunded => Some(&mut self.refunded_at),
            ShippingStatus::Registered
            | ShippingStatus::Preparing
            | ShippingStatus::CancelRequested => None,
        };
        if let Some(slot) = slot {
            if slot.is_none() {
                *slot = Some(at.to_string());
            }
        }
    }
}

/// A fully normalized order row, as stored and returned by the API.
///
/// Monetary amounts are whole currency units; dates are ISO 8601 strings
/// as the spreadsheets deliver them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Store-assigned row identifier. `None` until first persisted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    /// Marketplace order identifier; possibly empty.
    pub order_number: OrderNumber,
    /// Marketplace the order came from; possibly empty.
    pub market_name: MarketName,
    /// Display sequence code, assigned at ingestion for new rows.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sequence_code: Option<SequenceCode>,
    /// Date of the source spreadsheet, ISO 8601 calendar date.
    pub sheet_date: String,
    /// Date the buyer paid, if known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_date: Option<String>,
    /// Recipient name for delivery.
    pub recipient_name: String,
    /// Recipient phone number.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub recipient_phone: Option<String>,
    /// Recipient delivery address.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub recipient_address: Option<String>,
    /// Product option the buyer selected.
    pub option_name: String,
    /// Number of units ordered.
    pub quantity: i64,
    /// Per-unit supply price owed the seller, whole currency units.
    pub seller_supply_price: i64,
    /// Settlement amount for the order, whole currency units.
    #[serde(default)]
    pub settlement_amount: i64,
    /// Refund amount for the order, whole currency units.
    #[serde(default)]
    pub refund_amount: i64,
    /// Current shipping status.
    #[serde(default)]
    pub shipping_status: ShippingStatus,
    /// Carrier tracking number, once shipped.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tracking_number: Option<String>,
    /// Carrier the order shipped with.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub courier_company: Option<String>,
    /// Date the order shipped.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shipped_date: Option<String>,
    /// Free-form operator note.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memo: Option<String>,
    /// Owning organization, if the row is organization-scoped.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub org_id: Option<i64>,
    /// Seller sub-account the row belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sub_account_id: Option<i64>,
    /// Identifier of the caller who ingested the row.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_by: Option<String>,
    /// Identifier of the caller who last mutated the row.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_by: Option<String>,
    /// When the row was first persisted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<String>,
    /// When the row was last mutated.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<String>,
    /// Timestamps for status milestones the row has reached.
    #[serde(default)]
    pub milestones: StatusTimestamps,
    /// Soft-delete flag; deleted rows stay queryable for audit.
    #[serde(default)]
    pub is_deleted: bool,
}

impl OrderRecord {
    /// Returns true if this row is visible to `scope`.
    #[must_use]
    pub const fn in_scope(&self, scope: &AccessScope) -> bool {
        scope.permits(self.org_id)
    }

    /// Returns the total supply amount for the row.
    #[must_use]
    pub const fn supply_total(&self) -> i64 {
        self.seller_supply_price.saturating_mul(self.quantity)
    }
}

/// A raw order row as it arrives from a spreadsheet upload, before
/// normalization. Every field is optional or free-form; normalization
/// applies defaults and validates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    /// Raw order identifier, possibly empty.
    pub order_number: String,
    /// Raw market name, possibly empty.
    pub market_name: String,
    /// Spreadsheet date, if the upload carried one.
    pub sheet_date: Option<String>,
    /// Payment date, if present.
    pub payment_date: Option<String>,
    /// Recipient name.
    pub recipient_name: String,
    /// Recipient phone number.
    pub recipient_phone: Option<String>,
    /// Recipient address.
    pub recipient_address: Option<String>,
    /// Product option text.
    pub option_name: String,
    /// Unit count; defaults to 1 when absent.
    pub quantity: Option<i64>,
    /// Per-unit supply price; defaults to 0 when absent.
    pub seller_supply_price: Option<i64>,
    /// Settlement amount; defaults to 0 when absent.
    pub settlement_amount: Option<i64>,
    /// Refund amount; defaults to 0 when absent.
    pub refund_amount: Option<i64>,
    /// Raw shipping status string; defaults to registered when absent.
    pub shipping_status: Option<String>,
    /// Sequence code template from the sheet, e.g. `GM0000`. Only the
    /// prefix is preserved; the number is reassigned at ingestion.
    pub sequence_code: Option<String>,
    /// Carrier tracking number.
    pub tracking_number: Option<String>,
    /// Carrier name.
    pub courier_company: Option<String>,
    /// Ship date.
    pub shipped_date: Option<String>,
    /// Operator note.
    pub memo: Option<String>,
    /// Owning organization, for privileged callers placing rows.
    pub org_id: Option<i64>,
    /// Seller sub-account.
    pub sub_account_id: Option<i64>,
}
