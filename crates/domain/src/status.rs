// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shipping status tracking for order records.
//!
//! Status changes are caller-initiated only; the system never advances
//! status based on time alone. Transitions are detected by comparing a
//! record snapshot before and after a mutation.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Shipping status states an order moves through between registration
/// and settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingStatus {
    /// Order has been ingested but not yet acknowledged by the seller
    #[default]
    Registered,
    /// Seller has confirmed the order for fulfilment
    Confirmed,
    /// Settlement payment has been recorded for the order
    PaymentComplete,
    /// Order is being prepared for shipment
    Preparing,
    /// Order has left the warehouse with a carrier
    Shipped,
    /// Seller has asked for the order to be cancelled
    CancelRequested,
    /// Cancellation was approved and the order is closed
    Cancelled,
    /// Refund has been issued for the order
    Refunded,
}

impl ShippingStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Confirmed => "confirmed",
            Self::PaymentComplete => "payment-complete",
            Self::Preparing => "preparing",
            Self::Shipped => "shipped",
            Self::CancelRequested => "cancel-requested",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidShippingStatus` if the string is not
    /// a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "registered" => Ok(Self::Registered),
            "confirmed" => Ok(Self::Confirmed),
            "payment-complete" => Ok(Self::PaymentComplete),
            "preparing" => Ok(Self::Preparing),
            "shipped" => Ok(Self::Shipped),
            "cancel-requested" => Ok(Self::CancelRequested),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            _ => Err(DomainError::InvalidShippingStatus(s.to_string())),
        }
    }

    /// Returns true if this status was set by a seller-side action
    /// rather than an operator-side one.
    #[must_use]
    pub const fn is_seller_action(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CancelRequested)
    }

    /// Returns true if the order is closed and no further fulfilment
    /// work is expected.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Refunded)
    }
}

impl FromStr for ShippingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ShippingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
