use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::handlers::{read_food_image, AnalysisHandler};
use crate::models::AnalysisResponse;

pub struct AppState {
    pub analysis_handler: Arc<AnalysisHandler>,
}

pub fn create_router(analysis_handler: Arc<AnalysisHandler>, config: &Config) -> Router {
    let state = Arc::new(AppState { analysis_handler });

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/analyze-food", post(analyze_food_handler))
        .nest_service("/app", ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state)
}

async fn analyze_food_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, AnalysisError> {
    let mut multipart = multipart.map_err(|e| {
        log::warn!("⚠️ /analyze-food called without a multipart body: {}", e);
        AnalysisError::NoFile
    })?;

    let request = read_food_image(&mut multipart).await?;
    let analysis = state.analysis_handler.analyze(request).await?;

    Ok(Json(AnalysisResponse { analysis }))
}

async fn root_handler() -> &'static str {
    "Food Image Analyzer backend is running - POST a photo to /analyze-food, open /app/ for the web client"
}

async fn health_check() -> &'static str {
    "OK"
}
