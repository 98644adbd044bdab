//! HTTP request handlers for the fatwa service.
//!
//! Implements submission, listing, tracking lookup, review and health check
//! endpoints using axum. Store calls are synchronous and run on the blocking
//! pool.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use ifta_domain::traits::RequestStore;
use ifta_domain::{
    Request, RequestId, RequestSummary, ReviewDecision, Submission, TrackingStatus,
    ValidationError,
};
use ifta_service::{
    ListingConfig, ListingQuery, ReviewService, ServiceError, SubmissionService, TransitionError,
};
use ifta_store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::error;

/// Acknowledgment shown after a successful submission
pub const SUBMITTED_MESSAGE: &str =
    "آپ کا فتویٰ کامیابی سے موصول ہو گیا ہے۔ جلد ہی ای میل کے ذریعے جواب دیا جائے گا۔";

/// Shown when mandatory fields are blank
pub const MISSING_FIELDS_MESSAGE: &str = "تمام ضروری خانے پُر کریں۔";

/// Shown when the email address is malformed
pub const INVALID_EMAIL_MESSAGE: &str = "براہ کرم درست ای میل پتہ درج کریں۔";

/// Generic failure shown for storage and internal errors
pub const SERVER_FAILURE_MESSAGE: &str = "سرور کا مسئلہ ہے۔ براہ کرم بعد میں کوشش کریں۔";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Request store handle
    pub store: Arc<SqliteStore>,
    /// Public listing limits
    pub listing: ListingConfig,
    /// Static pages served for unmatched paths
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    /// Create state over a store with default listing limits
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self {
            store,
            listing: ListingConfig::default(),
            static_dir: None,
        }
    }
}

/// Successful submission response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Human-readable acknowledgment
    pub message: String,
    /// Tracking id of the new request
    pub tracking_id: RequestId,
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    /// Number of entries wanted (clamped to the configured maximum)
    pub limit: Option<usize>,
}

/// Reviewer decision kind
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    /// Answer the question
    Answer,
    /// Decline the request
    Reject,
}

/// Review request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    /// Decision to apply
    pub decision: DecisionKind,
    /// Answer text (required for `answer`)
    #[serde(default)]
    pub answer: Option<String>,
    /// Answering mufti (required for `answer`)
    #[serde(default)]
    pub mufti_name: Option<String>,
}

impl From<ReviewRequest> for ReviewDecision {
    fn from(request: ReviewRequest) -> Self {
        match request.decision {
            DecisionKind::Answer => ReviewDecision::Answer {
                answer: request.answer.unwrap_or_default(),
                mufti_name: request.mufti_name.unwrap_or_default(),
            },
            DecisionKind::Reject => ReviewDecision::Reject,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Requests awaiting review
    pub pending: u64,
    /// Answered requests
    pub answered: u64,
    /// Rejected requests
    pub rejected: u64,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Lifecycle operation error
    Service(ServiceError),
    /// Malformed request (body or path)
    BadRequest(String),
    /// Internal server error
    Internal(String),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Service(ServiceError::Validation(ValidationError::MissingFields(_))) => {
                (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE.to_string())
            }
            ApiError::Service(ServiceError::Validation(ValidationError::InvalidEmail(_))) => {
                (StatusCode::BAD_REQUEST, INVALID_EMAIL_MESSAGE.to_string())
            }
            ApiError::Service(e @ ServiceError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Service(
                e @ ServiceError::InvalidTransition(TransitionError::AlreadyDecided(_)),
            ) => (StatusCode::CONFLICT, e.to_string()),
            ApiError::Service(e @ ServiceError::InvalidTransition(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Service(ServiceError::Storage(_)) | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                SERVER_FAILURE_MESSAGE.to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            match &self {
                ApiError::Service(e) => error!(error = %e, "Request failed"),
                ApiError::Internal(msg) => error!(error = %msg, "Request failed"),
                ApiError::BadRequest(_) => {}
            }
        }

        let body = Json(ErrorResponse { message });
        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError::Service(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Run a synchronous service call on the blocking pool
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Blocking task failed: {}", e)))?
        .map_err(ApiError::from)
}

fn parse_id(raw: &str) -> Result<RequestId, ApiError> {
    RequestId::from_string(raw).map_err(ApiError::BadRequest)
}

/// POST /api/fatwa - Submit a new question
async fn submit_fatwa(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(submission) = payload?;

    let service = SubmissionService::new(Arc::clone(&state.store));
    let tracking_id = run_blocking(move || service.submit(submission)).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: SUBMITTED_MESSAGE.to_string(),
            tracking_id,
        }),
    ))
}

/// GET /api/fatwa/recent - Recently answered questions
async fn recent_fatwas(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Vec<RequestSummary>>, ApiError> {
    let listing = ListingQuery::with_config(Arc::clone(&state.store), state.listing.clone());
    let summaries = run_blocking(move || listing.list_recent(params.limit)).await?;
    Ok(Json(summaries))
}

/// GET /api/fatwa/:id - Status of a request by tracking id
async fn fatwa_status(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<TrackingStatus>, ApiError> {
    let id = parse_id(&raw_id)?;
    let listing = ListingQuery::with_config(Arc::clone(&state.store), state.listing.clone());
    let status = run_blocking(move || listing.tracking_status(id)).await?;
    Ok(Json(status))
}

/// POST /api/admin/fatwa/:id/review - Answer or reject a pending request
async fn review_fatwa(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<Request>, ApiError> {
    let id = parse_id(&raw_id)?;
    let Json(review) = payload?;

    let service = ReviewService::new(Arc::clone(&state.store));
    let decision = ReviewDecision::from(review);
    let request = run_blocking(move || service.review(id, decision)).await?;
    Ok(Json(request))
}

/// GET /health - Store health and request counts
async fn health_check(State(state): State<AppState>) -> Response {
    let store = Arc::clone(&state.store);
    let counts = tokio::task::spawn_blocking(move || store.count_by_status()).await;

    match counts {
        Ok(Ok(counts)) => Json(HealthCheckResponse {
            status: "healthy".to_string(),
            pending: counts.pending,
            answered: counts.answered,
            rejected: counts.rejected,
        })
        .into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "Health check failed");
            unhealthy()
        }
        Err(e) => {
            error!(error = %e, "Health check task failed");
            unhealthy()
        }
    }
}

fn unhealthy() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthCheckResponse {
            status: "unhealthy".to_string(),
            pending: 0,
            answered: 0,
            rejected: 0,
        }),
    )
        .into_response()
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let router = AxumRouter::new()
        .route("/api/fatwa", post(submit_fatwa))
        .route("/api/fatwa/recent", get(recent_fatwas))
        .route("/api/fatwa/:id", get(fatwa_status))
        .route("/api/admin/fatwa/:id/review", post(review_fatwa))
        .route("/health", get(health_check));

    let router = match &state.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
