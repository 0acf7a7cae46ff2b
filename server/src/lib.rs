//! HTTP API for the Hydrodash admin dashboard listings.
//!
//! One set of routes per resource kind, all under `/api/v1`:
//! - `GET /{kind}` and `GET /{kind}/archived` — paginated listings
//! - `PATCH /{kind}/{id}/archive` and `/unarchive` — partition moves
//! - `PUT`/`PATCH /{kind}/{id}` — validated field edits
//!
//! Handlers run the synchronous listing services on the blocking pool.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, put};
use axum::Router;
use hydrodash_listing::{
    ArchiveOutcome, ArchivePartition, ErrorBody, ListingConfig, ListingError, ListingRequest,
    ListingResponse, ListingResult, ListingService, API_PREFIX,
};
use hydrodash_storage::SqliteRecordStore;
use hydrodash_types::{RecordId, RecordUpdate, ResourceKind, ResourceRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

type Service = ListingService<SqliteRecordStore>;

/// Settings the router is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listing: ListingConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the HTTP API router over the given store.
pub fn build_router(store: Arc<SqliteRecordStore>, config: ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(resource_routes(ListingService::new(
            ResourceKind::Users,
            Arc::clone(&store),
            config.listing,
        )))
        .merge(resource_routes(ListingService::new(
            ResourceKind::Devices,
            store,
            config.listing,
        )))
}

fn resource_routes(service: Service) -> Router {
    let base = format!("{API_PREFIX}/{}", service.kind().path_segment());
    Router::new()
        .route(&base, get(list_active_handler))
        .route(&format!("{base}/archived"), get(list_archived_handler))
        .route(&format!("{base}/{{id}}"), put(update_handler).patch(update_handler))
        .route(&format!("{base}/{{id}}/archive"), patch(archive_handler))
        .route(&format!("{base}/{{id}}/unarchive"), patch(unarchive_handler))
        .with_state(service)
}

// ── Handlers ─────────────────────────────────────────────────────

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_active_handler(
    State(service): State<Service>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ListingResponse>> {
    list(service, params, ArchivePartition::Active).await
}

async fn list_archived_handler(
    State(service): State<Service>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ListingResponse>> {
    list(service, params, ArchivePartition::Archived).await
}

async fn list(
    service: Service,
    params: BTreeMap<String, String>,
    partition: ArchivePartition,
) -> ApiResult<Json<ListingResponse>> {
    let request = ListingRequest::from_query(&params);
    let response = blocking(move || service.list(&request, partition)).await?;
    Ok(Json(response))
}

async fn archive_handler(
    State(service): State<Service>,
    Path(raw): Path<String>,
) -> ApiResult<Json<ArchiveOutcome>> {
    let id = parse_id(service.kind(), raw)?;
    Ok(Json(blocking(move || service.archive(id)).await?))
}

async fn unarchive_handler(
    State(service): State<Service>,
    Path(raw): Path<String>,
) -> ApiResult<Json<ArchiveOutcome>> {
    let id = parse_id(service.kind(), raw)?;
    Ok(Json(blocking(move || service.unarchive(id)).await?))
}

async fn update_handler(
    State(service): State<Service>,
    Path(raw): Path<String>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResult<Json<ResourceRecord>> {
    let id = parse_id(service.kind(), raw)?;
    let Json(body) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let update = match service.kind() {
        ResourceKind::Users => RecordUpdate::User(serde_json::from_value(body)?),
        ResourceKind::Devices => RecordUpdate::Device(serde_json::from_value(body)?),
    };
    Ok(Json(blocking(move || service.update(id, &update)).await?))
}

/// Ids that are not positive integers name no record.
fn parse_id(kind: ResourceKind, raw: String) -> ApiResult<RecordId> {
    raw.parse().map_err(|_| ApiError::UnknownId { kind, raw })
}

async fn blocking<T, F>(op: F) -> ApiResult<T>
where
    F: FnOnce() -> ListingResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(op).await??)
}

// ── Errors ───────────────────────────────────────────────────────

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors a handler can return, rendered as an [`ErrorBody`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Listing, archive or update failure.
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// The path id is not a record identity.
    #[error("{} {raw} not found", .kind.singular())]
    UnknownId { kind: ResourceKind, raw: String },

    /// The body was not JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The body was JSON of the wrong shape.
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// A blocking worker panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Listing(ListingError::RecordNotFound { .. }) | Self::UnknownId { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::Listing(ListingError::ValidationFailed(_))
            | Self::MalformedBody(_)
            | Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Listing(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Listing(ListingError::RecordNotFound { .. }) | Self::UnknownId { .. } => ErrorBody {
                code: "RecordNotFound".to_string(),
                message: self.to_string(),
                field_errors: None,
            },
            Self::Listing(ListingError::ValidationFailed(errors)) => ErrorBody {
                code: "ValidationFailed".to_string(),
                message: "The given data was invalid.".to_string(),
                field_errors: Some(errors.clone()),
            },
            Self::MalformedBody(_) | Self::InvalidBody(_) => ErrorBody {
                code: "ValidationFailed".to_string(),
                message: self.to_string(),
                field_errors: None,
            },
            Self::Listing(_) | Self::Worker(_) => ErrorBody {
                code: "Internal".to_string(),
                message: "internal server error".to_string(),
                field_errors: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
