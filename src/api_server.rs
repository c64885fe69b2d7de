// Axum API server module
//
// Serves the derived dashboard views to the rendering collaborator as JSON.
// Each request recomputes views from the cached immutable table; responses
// are cached in Moka keyed by (endpoint, filter parameters, dataset version)
// so a reloaded source file never serves stale aggregates.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use serde::Serialize;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::cache::DatasetCache;
use crate::error::DashboardError;
use crate::views::{self, RegionSelection, DEFAULT_SUPPORT_THRESHOLD};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<DatasetCache>,
    pub cache: Cache<String, serde_json::Value>,
}

impl AppState {
    /// Build the state and load the dataset eagerly so a broken source file
    /// fails startup instead of the first request.
    pub fn new(data_path: &str) -> anyhow::Result<Self> {
        let dataset = Arc::new(DatasetCache::new(data_path));

        let records = dataset.get()?;
        tracing::info!("Loaded {} sales records from {}", records.len(), data_path);

        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(300))
            .build();

        Ok(Self { dataset, cache })
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Dashboard views (JSON API)
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/kpis", get(get_kpis))
        .route("/api/ranking", get(get_ranking))
        .route("/api/rollup", get(get_rollup))
        .route("/api/support", get(get_support))
        .route("/api/regions", get(get_regions))
        // Manual cache invalidation
        .route("/api/refresh", post(refresh))
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Query Contract
// ============================================================================

/// Filter parameters shared by the view endpoints.
///
/// `regions` is a comma-separated label list; absent means all regions, and
/// the "All Regions" sentinel anywhere in the list also selects everything.
/// `threshold` must lie in [0.0, 1.0]; default 0.6.
#[derive(Debug, serde::Deserialize)]
struct ViewQuery {
    regions: Option<String>,
    threshold: Option<f64>,
}

fn parse_query(query: &ViewQuery) -> Result<(RegionSelection, f64), AppError> {
    let threshold = query.threshold.unwrap_or(DEFAULT_SUPPORT_THRESHOLD);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AppError::BadRequest(format!(
            "threshold must be within [0.0, 1.0], got {}",
            threshold
        )));
    }

    let selection = match &query.regions {
        None => RegionSelection::All,
        Some(raw) => {
            let labels: Vec<&str> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            RegionSelection::from_labels(&labels)
        }
    };

    Ok((selection, threshold))
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Full snapshot: all four views over one filtered slice, computed on the
/// blocking pool since the view fan-out is CPU-bound.
async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (selection, threshold) = parse_query(&query)?;
    let records = state.dataset.get()?;

    let cache_key = format!(
        "dashboard:{}:{:?}:{}",
        state.dataset.version(),
        selection,
        threshold
    );
    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for {}", cache_key);
        return Ok(Json(cached));
    }

    let snapshot =
        tokio::task::spawn_blocking(move || views::snapshot(&records, &selection, threshold))
            .await
            .map_err(|e| AppError::Internal(format!("task join error: {}", e)))?;

    let value = to_value(&snapshot)?;
    state.cache.insert(cache_key, value.clone()).await;

    Ok(Json(value))
}

async fn get_kpis(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (selection, _) = parse_query(&query)?;
    let records = state.dataset.get()?;

    let cache_key = format!("kpis:{}:{:?}", state.dataset.version(), selection);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let filtered = selection.apply(&records);
    let value = to_value(&views::kpi::compute(&filtered))?;
    state.cache.insert(cache_key, value.clone()).await;

    Ok(Json(value))
}

async fn get_ranking(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (selection, _) = parse_query(&query)?;
    let records = state.dataset.get()?;

    let cache_key = format!("ranking:{}:{:?}", state.dataset.version(), selection);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let filtered = selection.apply(&records);
    let value = to_value(&views::ranking::compute(&filtered))?;
    state.cache.insert(cache_key, value.clone()).await;

    Ok(Json(value))
}

async fn get_rollup(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (selection, _) = parse_query(&query)?;
    let records = state.dataset.get()?;

    let cache_key = format!("rollup:{}:{:?}", state.dataset.version(), selection);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let filtered = selection.apply(&records);
    let value = to_value(&views::rollup::compute(&filtered))?;
    state.cache.insert(cache_key, value.clone()).await;

    Ok(Json(value))
}

async fn get_support(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (selection, threshold) = parse_query(&query)?;
    let records = state.dataset.get()?;

    let cache_key = format!(
        "support:{}:{:?}:{}",
        state.dataset.version(),
        selection,
        threshold
    );
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let filtered = selection.apply(&records);
    let value = to_value(&views::support::compute(&filtered, threshold))?;
    state.cache.insert(cache_key, value.clone()).await;

    Ok(Json(value))
}

/// Region labels for the multi-select control, sentinel first.
async fn get_regions(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let records = state.dataset.get()?;

    let cache_key = format!("regions:{}", state.dataset.version());
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let value = to_value(&views::region_options(&records))?;
    state.cache.insert(cache_key, value.clone()).await;

    Ok(Json(value))
}

/// Drop the dataset and response caches, then reload to report the fresh
/// row count. A broken source file surfaces here as 503.
async fn refresh(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state.dataset.invalidate();
    state.cache.invalidate_all();

    let records = state.dataset.get()?;
    tracing::info!("Dataset reloaded: {} rows", records.len());

    Ok(Json(serde_json::json!({
        "status": "reloaded",
        "rows": records.len()
    })))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn to_value<T: Serialize>(payload: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(payload)
        .map_err(|e| AppError::Internal(format!("JSON serialization error: {}", e)))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::DataUnavailable(_) => AppError::Unavailable(err.to_string()),
            DashboardError::SchemaMismatch(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
