// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response contracts for the bulk endpoints.

use bulk_orders_domain::{OrderDraft, OrderRecord};
use serde::{Deserialize, Deserializer, Serialize};

/// Accepts an order identifier as either a JSON string or a bare
/// number. Spreadsheet exports are inconsistent about which they send.
fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => String::new(),
        Some(Raw::Text(text)) => text,
        Some(Raw::Number(number)) => number.to_string(),
    })
}

/// One raw order row in a bulk ingestion request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRowInput {
    /// Marketplace order identifier; string or number, possibly absent.
    #[serde(default, deserialize_with = "deserialize_flexible_id")]
    pub order_number: String,
    /// Marketplace name.
    #[serde(default)]
    pub market_name: String,
    /// Spreadsheet date.
    #[serde(default)]
    pub sheet_date: Option<String>,
    /// Payment date.
    #[serde(default)]
    pub payment_date: Option<String>,
    /// Recipient name.
    #[serde(default)]
    pub recipient_name: String,
    /// Recipient phone.
    #[serde(default)]
    pub recipient_phone: Option<String>,
    /// Recipient address.
    #[serde(default)]
    pub recipient_address: Option<String>,
    /// Product option text.
    #[serde(default)]
    pub option_name: String,
    /// Unit count.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Per-unit supply price, whole currency units.
    #[serde(default)]
    pub seller_supply_price: Option<i64>,
    /// Settlement amount, whole currency units.
    #[serde(default)]
    pub settlement_amount: Option<i64>,
    /// Refund amount, whole currency units.
    #[serde(default)]
    pub refund_amount: Option<i64>,
    /// Shipping status string.
    #[serde(default)]
    pub shipping_status: Option<String>,
    /// Sequence code template from the sheet, e.g. `GM0000`.
    #[serde(default)]
    pub sequence_code: Option<String>,
    /// Carrier tracking number.
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Carrier name.
    #[serde(default)]
    pub courier_company: Option<String>,
    /// Ship date.
    #[serde(default)]
    pub shipped_date: Option<String>,
    /// Operator note.
    #[serde(default)]
    pub memo: Option<String>,
    /// Owning organization, honored for unrestricted callers only.
    #[serde(default)]
    pub org_id: Option<i64>,
    /// Seller sub-account.
    #[serde(default)]
    pub sub_account_id: Option<i64>,
}

impl OrderRowInput {
    /// Converts the wire row into a normalization draft.
    #[must_use]
    pub fn into_draft(self) -> OrderDraft {
        OrderDraft {
            order_number: self.order_number,
            market_name: self.market_name,
            sheet_date: self.sheet_date,
            payment_date: self.payment_date,
            recipient_name: self.recipient_name,
            recipient_phone: self.recipient_phone,
            recipient_address: self.recipient_address,
            option_name: self.option_name,
            quantity: self.quantity,
            seller_supply_price: self.seller_supply_price,
            settlement_amount: self.settlement_amount,
            refund_amount: self.refund_amount,
            shipping_status: self.shipping_status,
            sequence_code: self.sequence_code,
            tracking_number: self.tracking_number,
            courier_company: self.courier_company,
            shipped_date: self.shipped_date,
            memo: self.memo,
            org_id: self.org_id,
            sub_account_id: self.sub_account_id,
        }
    }
}

/// Bulk ingestion request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkCreateRequest {
    /// The rows to ingest.
    pub orders: Vec<OrderRowInput>,
    /// Write everything, replacing rows that share an identifier.
    #[serde(default)]
    pub overwrite_duplicates: bool,
    /// Write only the new rows, leaving duplicates untouched.
    #[serde(default)]
    pub skip_duplicate_check: bool,
}

/// Per-market batch numbering detail in a confirmation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBatchDetail {
    /// The market.
    pub market: String,
    /// Batch the next write for this market would use.
    pub current_batch: u32,
    /// First sequence number that batch would hand out.
    pub next_sequence_start: u32,
}

/// Batch numbering summary returned with a duplicate confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInfo {
    /// Highest batch across the affected markets.
    pub current_batch: u32,
    /// Per-market numbering detail.
    pub market_batch_details: Vec<MarketBatchDetail>,
    /// First sequence number of the representative batch.
    pub next_sequence_start: u32,
    /// Human-readable description of the code shape.
    pub sequence_format: String,
}

/// Bulk ingestion response, for both writes and dry-run confirmations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkCreateResponse {
    /// True for a completed write and for a confirmation payload; a
    /// confirmation is a round-trip request, not a failure.
    pub success: bool,
    /// Present and true only for a confirmation payload.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duplicates_detected: Option<bool>,
    /// Total rows in the request.
    pub total: usize,
    /// Rows not previously ingested.
    pub new_count: usize,
    /// Rows colliding with already ingested identifiers.
    pub duplicate_count: usize,
    /// Batch numbering info, present on confirmation payloads.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub batch_info: Option<BatchInfo>,
    /// The rows as persisted, present after a write.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Vec<OrderRecord>>,
}

/// Bulk mutation request. Rows are free-form maps; only allow-listed
/// fields are honored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkUpdateRequest {
    /// The per-row field maps, each expected to carry an `id`.
    pub orders: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// One row that could not be updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// The row identifier, when the row carried one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    /// Why the row failed.
    pub error: String,
}

/// Explicit per-record result collection for a bulk mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUpdateOutcome {
    /// True when every row updated cleanly.
    pub success: bool,
    /// How many rows updated.
    pub count: usize,
    /// The updated rows.
    pub succeeded: Vec<OrderRecord>,
    /// The rows that failed, with reasons.
    pub failed: Vec<RecordFailure>,
}

/// Bulk soft-delete request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkDeleteRequest {
    /// Identifiers of the rows to delete.
    pub ids: Vec<i64>,
}

/// Bulk soft-delete response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    /// Always true for a completed deletion.
    pub success: bool,
    /// How many live rows were marked deleted.
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_accepts_string_or_number() {
        let from_string: OrderRowInput =
            serde_json::from_value(serde_json::json!({"order_number": "20260829001"})).unwrap();
        let from_number: OrderRowInput =
            serde_json::from_value(serde_json::json!({"order_number": 20_260_829_001_i64}))
                .unwrap();

        assert_eq!(from_string.order_number, "20260829001");
        assert_eq!(from_number.order_number, "20260829001");
    }

    #[test]
    fn test_missing_order_number_becomes_empty() {
        let row: OrderRowInput =
            serde_json::from_value(serde_json::json!({"market_name": "Gmarket"})).unwrap();
        assert!(row.order_number.is_empty());
    }
}
