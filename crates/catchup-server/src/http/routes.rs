use super::{AppError, AppResult, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use catchup_core::{CatchUpRequest, CatchUpResponse};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the HTTP router. Files under `static_dir` are served for any path the
/// API does not claim.
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/catchup", post(catchup))
        .route("/api/health", get(health))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    router
        .layer(cors())
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers([header::LINK])
        .max_age(Duration::from_secs(300))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn catchup(
    State(state): State<AppState>,
    payload: Result<Json<CatchUpRequest>, JsonRejection>,
) -> AppResult<Json<CatchUpResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Invalid catch-up request body: {}", rejection.body_text());
        AppError::bad_request("Invalid JSON", rejection.body_text())
    })?;

    info!(
        industry = %request.industry,
        time_period = %request.time_period,
        "Catch-up request"
    );

    let response = state.service.handle_request(&request).await?;
    Ok(Json(response))
}
