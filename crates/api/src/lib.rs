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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf
)]

//! API boundary for bulk order ingestion and reconciliation.
//!
//! Every operation follows the same shape: authenticate, authorize the
//! specific capability, validate input, then execute against the store.
//! Authorization failures surface before any store access happens.

mod auth;
mod bulk_create;
mod bulk_delete;
mod bulk_update;
mod csv_preview;
mod enrich;
mod error;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedActor, Capability, PermissionMatrix, Role, StaticMatrix, authenticate, authorize,
};
pub use bulk_create::bulk_create;
pub use bulk_delete::bulk_delete;
pub use bulk_update::bulk_update;
pub use csv_preview::{CsvPreviewResult, CsvRowResult, CsvRowStatus, preview_csv};
pub use enrich::{CatalogEnricher, NoopEnricher};
pub use error::{ApiError, AuthError, translate_domain_error};
pub use request_response::{
    BatchInfo, BulkCreateRequest, BulkCreateResponse, BulkDeleteRequest, BulkDeleteResponse,
    BulkUpdateOutcome, BulkUpdateRequest, MarketBatchDetail, OrderRowInput, RecordFailure,
};
