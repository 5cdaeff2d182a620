// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Market-scoped display sequence codes.
//!
//! A sequence code is a letter prefix (the market's short code) followed
//! by a four-digit zero-padded number, e.g. `GM1002`. The thousands digit
//! of the number is the batch the order was ingested in.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Highest number representable in the four-digit code suffix.
const MAX_SEQUENCE_NUMBER: u32 = 9999;

/// A structured market sequence code: alphabetic prefix plus numeric part.
///
/// The string form is always `{prefix}{number:04}`. Parsing and
/// formatting round-trip for any valid code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SequenceCode {
    prefix: String,
    number: u32,
}

impl SequenceCode {
    /// Creates a sequence code from a prefix and a number.
    ///
    /// The prefix is uppercased for consistent display.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is empty or contains non-alphabetic
    /// characters, or if the number does not fit in four digits.
    pub fn new(prefix: &str, number: u32) -> Result<Self, DomainError> {
        let trimmed: &str = prefix.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidSequenceCode {
                code: format!("{prefix}{number:04}"),
                reason: String::from("prefix must not be empty"),
            });
        }
        if !trimmed.chars().all(char::is_alphabetic) {
            return Err(DomainError::InvalidSequenceCode {
                code: format!("{prefix}{number:04}"),
                reason: String::from("prefix must be alphabetic"),
            });
        }
        if number > MAX_SEQUENCE_NUMBER {
            return Err(DomainError::SequenceNumberOutOfRange { number });
        }
        Ok(Self {
            prefix: trimmed.to_uppercase(),
            number,
        })
    }

    /// Parses a code string by splitting at the first digit.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no alphabetic prefix, no numeric
    /// part, or the numeric part does not fit in four digits.
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        let trimmed: &str = code.trim();
        let split_at: usize = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| DomainError::InvalidSequenceCode {
                code: trimmed.to_string(),
                reason: String::from("missing numeric part"),
            })?;
        let (prefix, digits): (&str, &str) = trimmed.split_at(split_at);
        let number: u32 =
            digits
                .parse()
                .map_err(|_| DomainError::InvalidSequenceCode {
                    code: trimmed.to_string(),
                    reason: String::from("numeric part is not a valid number"),
                })?;
        Self::new(prefix, number)
    }

    /// Returns the alphabetic prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the numeric part of the code.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns the ingestion batch this code belongs to, derived from
    /// the thousands digit of the number.
    #[must_use]
    pub const fn batch(&self) -> u32 {
        self.number / 1000
    }

    /// Returns a new code with the same prefix and a different number.
    ///
    /// # Errors
    ///
    /// Returns an error if the number does not fit in four digits.
    pub fn with_number(&self, number: u32) -> Result<Self, DomainError> {
        if number > MAX_SEQUENCE_NUMBER {
            return Err(DomainError::SequenceNumberOutOfRange { number });
        }
        Ok(Self {
            prefix: self.prefix.clone(),
            number,
        })
    }

    /// Formats the code as its canonical zero-padded string.
    #[must_use]
    pub fn format(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }
}

impl FromStr for SequenceCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SequenceCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SequenceCode> for String {
    fn from(code: SequenceCode) -> Self {
        code.format()
    }
}

impl std::fmt::Display for SequenceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:04}", self.prefix, self.number)
    }
}
