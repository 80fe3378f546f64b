// 🌐 HTTP API - calculator pages + simulation endpoint
// Request flow: validate → fetch price series (blocking pool) → simulate → respond

use crate::error::{ProviderError, RequestError, SimulationError};
use crate::plan::Frequency;
use crate::providers::PriceProvider;
use crate::simulator::{simulate, SimulationReport};
use crate::validation::{validate, SubmitRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Instrument};

/// Supplies "today" for date validation
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn PriceProvider>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(provider: Arc<dyn PriceProvider>) -> Self {
        AppState {
            provider,
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Replace the clock (tests pin "today")
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// Body of a successful simulation
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub symbol: String,
    /// Amount exactly as submitted
    pub amount: Value,
    pub frequency: Frequency,
    pub start_date: String,
    pub end_date: String,
    pub results: SimulationReport,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    provider: String,
}

/// Error body: `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<SimulationError> for ApiError {
    fn from(err: SimulationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Http(_) | ProviderError::Io(_) => ApiError {
                status: StatusCode::BAD_GATEWAY,
                detail: err.to_string(),
            },
            ProviderError::NoData { .. } | ProviderError::Malformed { .. } => {
                ApiError::bad_request(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

// ============================================================================
// API HANDLERS
// ============================================================================

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
        provider: state.provider.name().to_string(),
    })
}

/// POST /api/submit-dates - Run the DCA comparison
async fn submit_dates(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("submit_dates", %request_id);

    run_submission(state, payload).instrument(span).await
}

async fn run_submission(
    state: AppState,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected request body");
        ApiError::from(rejection)
    })?;

    let validated = validate(&request, (state.clock)()).map_err(|e| {
        warn!(error = %e, "invalid submission");
        ApiError::from(e)
    })?;

    info!(
        symbol = %validated.symbol,
        amount = validated.amount,
        frequency = %validated.frequency,
        start = %validated.start_date,
        end = %validated.end_date,
        "fetching price series"
    );

    let provider = state.provider.clone();
    let (symbol, start, end) = (
        validated.symbol.clone(),
        validated.start_date,
        validated.end_date,
    );
    let series = tokio::task::spawn_blocking(move || provider.daily_bars(&symbol, start, end))
        .await
        .map_err(|e| ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("price fetch task failed: {}", e),
        })?
        .map_err(|e| {
            warn!(error = %e, "price series unavailable");
            ApiError::from(e)
        })?;

    let results = simulate(&series, validated.amount, validated.frequency).map_err(|e| {
        warn!(error = %e, bars = series.len(), "simulation rejected price series");
        ApiError::from(e)
    })?;

    info!(bars = series.len(), best = %results.best(), "simulation complete");

    Ok(Json(SubmitResponse {
        symbol: validated.symbol,
        amount: request.amount.unwrap_or(Value::Null),
        frequency: validated.frequency,
        start_date: validated.start_date.to_string(),
        // Echo what the caller sent; a blank end date reports the resolved one
        end_date: request
            .end_date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| validated.end_date.to_string()),
        results,
    }))
}

// ============================================================================
// PAGES
// ============================================================================

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

/// GET /calculator - Serve the DCA calculator page
async fn serve_calculator() -> impl IntoResponse {
    Html(include_str!("../web/dca.html"))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Build the full application router; static assets are served from `web_dir`
pub fn router(state: AppState, web_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/submit-dates", post(submit_dates))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .route("/calculator", get(serve_calculator))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(web_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
