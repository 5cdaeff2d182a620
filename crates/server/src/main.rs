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
#![allow(clippy::multiple_crate_versions)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State as AxumState,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use bulk_orders_api::{
    ApiError, AuthenticatedActor, BulkCreateRequest, BulkCreateResponse, BulkDeleteRequest,
    BulkDeleteResponse, BulkUpdateOutcome, BulkUpdateRequest, CatalogEnricher, CsvPreviewResult,
    NoopEnricher, OrderRowInput, PermissionMatrix, Role, StaticMatrix, authenticate, bulk_create,
    bulk_delete, bulk_update, preview_csv,
};
use bulk_orders_domain::AccessScope;
use bulk_orders_notify::{DispatchError, Notification, NotificationSink};
use bulk_orders_store::MemoryOrderStore;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Bulk Orders Server - HTTP server for the bulk order ingestion service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// Every collaborator the bulk operations need sits behind an `Arc`
/// so the router can be cloned per connection.
#[derive(Clone)]
struct AppState {
    /// The order store.
    store: Arc<MemoryOrderStore>,
    /// Catalog enrichment applied to normalized rows before writes.
    enricher: Arc<dyn CatalogEnricher>,
    /// The capability-to-role permission matrix.
    matrix: Arc<dyn PermissionMatrix>,
    /// Delivery channel for aggregated status notifications.
    sink: Arc<dyn NotificationSink>,
}

/// Sink that writes notifications to the structured log.
///
/// Stands in for a real delivery channel when the server runs without
/// one configured.
#[derive(Debug, Default)]
struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, notification: Notification) -> Result<(), DispatchError> {
        info!(
            audience = ?notification.audience,
            recipient = ?notification.recipient,
            title = %notification.title,
            order_count = notification.order_count,
            "Notification dispatched"
        );
        Ok(())
    }
}

/// API request for the bulk ingestion endpoint.
///
/// This includes authentication information in addition to the rows.
#[derive(Debug, Clone, Deserialize)]
struct BulkCreateApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The actor's organization, absent for unrestricted callers.
    #[serde(default)]
    org_id: Option<i64>,
    /// The rows to ingest.
    orders: Vec<OrderRowInput>,
    /// Write everything, replacing rows that share an identifier.
    #[serde(default)]
    overwrite_duplicates: bool,
    /// Write only the new rows, leaving duplicates untouched.
    #[serde(default)]
    skip_duplicate_check: bool,
}

/// API request for the bulk mutation endpoint.
#[derive(Debug, Clone, Deserialize)]
struct BulkUpdateApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The actor's organization, absent for unrestricted callers.
    #[serde(default)]
    org_id: Option<i64>,
    /// The per-row field maps, each expected to carry an `id`.
    orders: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// API request for the bulk soft-delete endpoint.
#[derive(Debug, Clone, Deserialize)]
struct BulkDeleteApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The actor's organization, absent for unrestricted callers.
    #[serde(default)]
    org_id: Option<i64>,
    /// Identifiers of the rows to delete.
    ids: Vec<i64>,
}

/// API request for the upload preview endpoint.
#[derive(Debug, Clone, Deserialize)]
struct CsvPreviewApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The raw CSV text to validate.
    data: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::Unauthorized { .. } | ApiError::ScopeViolation { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::InvalidInput { .. } | ApiError::InvalidCsvFormat { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::StoreFailure { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Store error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Parses a role string into a Role enum.
fn parse_role(role_str: &str) -> Result<Role, HttpError> {
    match role_str.to_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "staff" => Ok(Role::Staff),
        _ => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid role: '{role_str}'. Must be 'admin' or 'staff'"),
        }),
    }
}

/// Parses the actor fields of a request into an authenticated actor.
///
/// An `org_id` pins the actor to that organization; without one the
/// actor operates unrestricted.
fn resolve_actor(
    actor_id: &str,
    actor_role: &str,
    org_id: Option<i64>,
) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = parse_role(actor_role)?;
    let scope: AccessScope = org_id.map_or(AccessScope::Unrestricted, AccessScope::Organization);
    authenticate(actor_id, role, scope).map_err(|e| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: e.to_string(),
    })
}

/// Handler for POST `/orders/bulk` endpoint.
///
/// Ingests a batch of order rows, pausing for confirmation when
/// duplicates are detected and no resolution flag was sent.
async fn handle_bulk_create(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkCreateApiRequest>,
) -> Result<Json<BulkCreateResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        rows = req.orders.len(),
        overwrite = req.overwrite_duplicates,
        skip = req.skip_duplicate_check,
        "Handling bulk_create request"
    );

    let actor: AuthenticatedActor = resolve_actor(&req.actor_id, &req.actor_role, req.org_id)?;

    let create_request: BulkCreateRequest = BulkCreateRequest {
        orders: req.orders,
        overwrite_duplicates: req.overwrite_duplicates,
        skip_duplicate_check: req.skip_duplicate_check,
    };

    let response: BulkCreateResponse = bulk_create(
        app_state.store.as_ref(),
        app_state.enricher.as_ref(),
        app_state.matrix.as_ref(),
        &actor,
        create_request,
    )
    .await?;

    info!(
        success = response.success,
        new_count = response.new_count,
        duplicate_count = response.duplicate_count,
        "Completed bulk_create request"
    );

    Ok(Json(response))
}

/// Handler for PUT `/orders/bulk` endpoint.
///
/// Applies allow-listed field changes to each row and reports
/// per-record success and failure. Any row-level failure turns the
/// response into a 500, but committed rows stay committed and the
/// outcome body lists both sides.
async fn handle_bulk_update(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkUpdateApiRequest>,
) -> Result<Response, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        rows = req.orders.len(),
        "Handling bulk_update request"
    );

    let actor: AuthenticatedActor = resolve_actor(&req.actor_id, &req.actor_role, req.org_id)?;

    let outcome: BulkUpdateOutcome = bulk_update(
        app_state.store.as_ref(),
        app_state.sink.as_ref(),
        app_state.matrix.as_ref(),
        &actor,
        BulkUpdateRequest { orders: req.orders },
    )
    .await?;

    info!(
        success = outcome.success,
        updated = outcome.count,
        failed = outcome.failed.len(),
        "Completed bulk_update request"
    );

    // Partial failure surfaces as 500; the body still carries the
    // per-record collection so the caller can reconcile.
    let status: StatusCode = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(outcome)).into_response())
}

/// Handler for DELETE `/orders/bulk` endpoint.
///
/// Soft-deletes the identified rows, freeing their order numbers for
/// re-ingestion.
async fn handle_bulk_delete(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkDeleteApiRequest>,
) -> Result<Json<BulkDeleteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        ids = req.ids.len(),
        "Handling bulk_delete request"
    );

    let actor: AuthenticatedActor = resolve_actor(&req.actor_id, &req.actor_role, req.org_id)?;

    let response: BulkDeleteResponse = bulk_delete(
        app_state.store.as_ref(),
        app_state.matrix.as_ref(),
        &actor,
        BulkDeleteRequest { ids: req.ids },
    )
    .await?;

    info!(deleted = response.count, "Completed bulk_delete request");

    Ok(Json(response))
}

/// Handler for POST `/orders/preview` endpoint.
///
/// Validates an uploaded CSV without persisting anything.
async fn handle_csv_preview(
    Json(req): Json<CsvPreviewApiRequest>,
) -> Result<Json<CsvPreviewResult>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        bytes = req.data.len(),
        "Handling csv_preview request"
    );

    resolve_actor(&req.actor_id, &req.actor_role, None)?;

    let result: CsvPreviewResult = preview_csv(&req.data)?;

    info!(
        total_rows = result.total_rows,
        invalid = result.invalid_count,
        "Completed csv_preview request"
    );

    Ok(Json(result))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/orders/bulk",
            post(handle_bulk_create)
                .put(handle_bulk_update)
                .delete(handle_bulk_delete),
        )
        .route("/orders/preview", post(handle_csv_preview))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Bulk Orders Server");

    let app_state: AppState = AppState {
        store: Arc::new(MemoryOrderStore::new()),
        enricher: Arc::new(NoopEnricher),
        matrix: Arc::new(StaticMatrix),
        sink: Arc::new(LogSink),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
