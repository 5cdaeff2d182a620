// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft-to-record normalization.
//!
//! Spreadsheet rows arrive with missing fields and free-form strings.
//! Normalization applies the documented defaults, parses the status and
//! sequence template, and stamps provenance before anything touches the
//! store.

use bulk_orders_domain::{
    AccessScope, DomainError, MarketName, OrderDraft, OrderNumber, OrderRecord, SequenceCode,
    ShippingStatus, StatusTimestamps,
};

/// Request-level inputs shared by every row in a normalization pass.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// Identifier of the caller ingesting the batch.
    pub creator_id: String,
    /// Caller's organization visibility boundary.
    pub scope: AccessScope,
    /// Sheet date applied to rows that did not carry one.
    pub default_sheet_date: String,
}

/// Normalizes one draft row into a record ready for duplicate detection.
///
/// Rows without a sheet date inherit the context default. A missing
/// quantity defaults to 1, missing amounts to 0, and a missing status
/// to registered. A sequence template like `GM0000` keeps only its
/// prefix; the number is reassigned during allocation.
///
/// # Errors
///
/// Returns an error for an unparseable status or template, or a
/// non-positive quantity.
pub fn normalize_draft(
    draft: OrderDraft,
    context: &NormalizeContext,
) -> Result<OrderRecord, DomainError> {
    let shipping_status: ShippingStatus = match draft.shipping_status.as_deref() {
        None | Some("") => ShippingStatus::default(),
        Some(raw) => raw.trim().parse()?,
    };

    let sequence_code: Option<SequenceCode> = match draft.sequence_code.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(SequenceCode::parse(raw)?),
    };

    let quantity: i64 = draft.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(DomainError::InvalidQuantity { quantity });
    }

    let org_id: Option<i64> = match &context.scope {
        AccessScope::Organization(id) => Some(*id),
        AccessScope::Unrestricted => draft.org_id,
    };

    Ok(OrderRecord {
        id: None,
        order_number: OrderNumber::new(&draft.order_number),
        market_name: MarketName::new(&draft.market_name),
        sequence_code,
        sheet_date: draft
            .sheet_date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| context.default_sheet_date.clone()),
        payment_date: draft.payment_date,
        recipient_name: draft.recipient_name.trim().to_string(),
        recipient_phone: draft.recipient_phone,
        recipient_address: draft.recipient_address,
        option_name: draft.option_name.trim().to_string(),
        quantity,
        seller_supply_price: draft.seller_supply_price.unwrap_or(0),
        settlement_amount: draft.settlement_amount.unwrap_or(0),
        refund_amount: draft.refund_amount.unwrap_or(0),
        shipping_status,
        tracking_number: draft.tracking_number,
        courier_company: draft.courier_company,
        shipped_date: draft.shipped_date,
        memo: draft.memo,
        org_id,
        sub_account_id: draft.sub_account_id,
        created_by: Some(context.creator_id.clone()),
        updated_by: None,
        created_at: None,
        updated_at: None,
        milestones: StatusTimestamps::default(),
        is_deleted: false,
    })
}

/// Normalizes a whole batch, preserving row order.
///
/// # Errors
///
/// Fails on the first invalid row; bulk ingestion is all-or-nothing
/// before the store is touched.
pub fn normalize_batch(
    drafts: Vec<OrderDraft>,
    context: &NormalizeContext,
) -> Result<Vec<OrderRecord>, DomainError> {
    drafts
        .into_iter()
        .map(|draft| normalize_draft(draft, context))
        .collect()
}
