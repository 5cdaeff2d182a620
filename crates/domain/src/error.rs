// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Sequence code string does not match the letter-prefix plus digits shape.
    InvalidSequenceCode {
        /// The rejected code string.
        code: String,
        /// Description of what was wrong with it.
        reason: String,
    },
    /// Sequence number is outside the four-digit range.
    SequenceNumberOutOfRange {
        /// The rejected number.
        number: u32,
    },
    /// Shipping status string is not a recognized status.
    InvalidShippingStatus(String),
    /// Market name is empty or invalid.
    InvalidMarketName(String),
    /// Quantity must be a positive count.
    InvalidQuantity {
        /// The rejected quantity value.
        quantity: i64,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSequenceCode { code, reason } => {
                write!(f, "Invalid sequence code '{code}': {reason}")
            }
            Self::SequenceNumberOutOfRange { number } => {
                write!(
                    f,
                    "Sequence number {number} out of range. Must be at most 9999"
                )
            }
            Self::InvalidShippingStatus(status) => {
                write!(f, "Invalid shipping status: {status}")
            }
            Self::InvalidMarketName(msg) => write!(f, "Invalid market name: {msg}"),
            Self::InvalidQuantity { quantity } => {
                write!(f, "Invalid quantity: {quantity}. Must be greater than 0")
            }
        }
    }
}

impl std::error::Error for DomainError {}
