// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog enrichment seam.
//!
//! The product catalog lives in an external service. Before new rows
//! are written, the enricher gets a chance to fill in catalog-derived
//! fields (supply prices, canonical option names). The default
//! implementation passes rows through untouched.

use crate::error::ApiError;
use async_trait::async_trait;
use bulk_orders_domain::OrderRecord;

/// External catalog lookup applied to rows before they are written.
#[async_trait]
pub trait CatalogEnricher: Send + Sync {
    /// Enriches the rows in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog service failed; ingestion aborts
    /// rather than writing half-enriched rows.
    async fn enrich(&self, rows: &mut [OrderRecord]) -> Result<(), ApiError>;
}

/// Enricher that leaves every row untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnricher;

#[async_trait]
impl CatalogEnricher for NoopEnricher {
    async fn enrich(&self, _rows: &mut [OrderRecord]) -> Result<(), ApiError> {
        Ok(())
    }
}
