// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV preview and validation for bulk order upload.
//!
//! This module parses and validates an order spreadsheet without
//! persisting or mutating anything. Clients show the per-row results
//! before submitting the actual bulk ingestion.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::ApiError;
use bulk_orders_domain::ShippingStatus;

/// A single row result from CSV preview validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRowResult {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// The parsed order number (if present).
    pub order_number: Option<String>,
    /// The parsed market name (if valid).
    pub market_name: Option<String>,
    /// The parsed recipient name (if valid).
    pub recipient_name: Option<String>,
    /// The parsed option name (if valid).
    pub option_name: Option<String>,
    /// The parsed quantity (if valid).
    pub quantity: Option<i64>,
    /// The row status.
    pub status: CsvRowStatus,
    /// Zero or more validation errors.
    pub errors: Vec<String>,
}

/// Status of a CSV row validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvRowStatus {
    /// Row is valid and can be ingested.
    Valid,
    /// Row has validation errors and cannot be ingested.
    Invalid,
}

/// Result of CSV preview validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvPreviewResult {
    /// Per-row validation results.
    pub rows: Vec<CsvRowResult>,
    /// Total number of rows.
    pub total_rows: usize,
    /// Number of valid rows.
    pub valid_count: usize,
    /// Number of invalid rows.
    pub invalid_count: usize,
}

/// Required CSV column headers (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &[
    "market_name",
    "recipient_name",
    "option_name",
    "quantity",
];

/// Normalizes a CSV header string for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, ApiError> {
    let mut header_map: HashMap<String, usize> = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        let normalized: String = normalize_header(header);
        header_map.insert(normalized, idx);
    }

    let mut missing: Vec<String> = Vec::new();
    for required in REQUIRED_HEADERS {
        if !header_map.contains_key(*required) {
            missing.push(String::from(*required));
        }
    }

    if !missing.is_empty() {
        return Err(ApiError::InvalidCsvFormat {
            reason: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(header_map)
}

/// Extracts and validates a required field from a CSV row.
fn parse_required_field(
    get_field: &impl Fn(&str) -> Option<String>,
    field_name: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    let value: Option<String> = get_field(field_name);
    if value.is_none() {
        errors.push(format!("{field_name}: required field is missing or empty"));
    }
    value
}

/// Validates one CSV row.
fn parse_csv_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    row_number: usize,
    seen_numbers: &mut HashSet<String>,
) -> CsvRowResult {
    let mut errors: Vec<String> = Vec::new();

    let get_field = |name: &str| -> Option<String> {
        header_map
            .get(name)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let market_name: Option<String> = parse_required_field(&get_field, "market_name", &mut errors);
    let recipient_name: Option<String> =
        parse_required_field(&get_field, "recipient_name", &mut errors);
    let option_name: Option<String> = parse_required_field(&get_field, "option_name", &mut errors);

    let quantity: Option<i64> = match parse_required_field(&get_field, "quantity", &mut errors) {
        None => None,
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) if value > 0 => Some(value),
            Ok(value) => {
                errors.push(format!("quantity: {value} is not a positive count"));
                None
            }
            Err(_) => {
                errors.push(format!("quantity: invalid number '{raw}'"));
                None
            }
        },
    };

    // The order number is optional, but reused identifiers inside one
    // upload are almost certainly a copy-paste mistake.
    let order_number: Option<String> = get_field("order_number");
    if let Some(number) = &order_number {
        if !seen_numbers.insert(number.clone()) {
            errors.push(format!(
                "order_number: '{number}' appears more than once in this file"
            ));
        }
    }

    if let Some(raw) = get_field("shipping_status") {
        if raw.parse::<ShippingStatus>().is_err() {
            errors.push(format!(
                "shipping_status: '{raw}' is not a recognized status"
            ));
        }
    }

    if let Some(raw) = get_field("seller_supply_price") {
        if raw.parse::<i64>().is_err() {
            errors.push(format!("seller_supply_price: invalid number '{raw}'"));
        }
    }

    let status: CsvRowStatus = if errors.is_empty() {
        CsvRowStatus::Valid
    } else {
        CsvRowStatus::Invalid
    };
    CsvRowResult {
        row_number,
        order_number,
        market_name,
        recipient_name,
        option_name,
        quantity,
        status,
        errors,
    }
}

/// Parses and validates CSV order data without persisting anything.
///
/// # Errors
///
/// Returns an error when the CSV cannot be parsed at all or is missing
/// required headers. Per-row problems are reported in the result, not
/// as errors.
pub fn preview_csv(data: &str) -> Result<CsvPreviewResult, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers: StringRecord =
        reader
            .headers()
            .cloned()
            .map_err(|error| ApiError::InvalidCsvFormat {
                reason: format!("Failed to read headers: {error}"),
            })?;
    let header_map: HashMap<String, usize> = validate_headers(&headers)?;

    let mut rows: Vec<CsvRowResult> = Vec::new();
    let mut seen_numbers: HashSet<String> = HashSet::new();
    for (index, record) in reader.records().enumerate() {
        let row_number: usize = index + 1;
        match record {
            Ok(record) => {
                rows.push(parse_csv_row(
                    &record,
                    &header_map,
                    row_number,
                    &mut seen_numbers,
                ));
            }
            Err(error) => rows.push(CsvRowResult {
                row_number,
                order_number: None,
                market_name: None,
                recipient_name: None,
                option_name: None,
                quantity: None,
                status: CsvRowStatus::Invalid,
                errors: vec![format!("Failed to parse row: {error}")],
            }),
        }
    }

    let valid_count: usize = rows
        .iter()
        .filter(|row| row.status == CsvRowStatus::Valid)
        .count();
    let invalid_count: usize = rows.len() - valid_count;
    Ok(CsvPreviewResult {
        total_rows: rows.len(),
        valid_count,
        invalid_count,
        rows,
    })
}
