use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::Utc;

use crate::{main_lib::AppState, models::HealthResponse};

/// Liveness probe. Does not look at the quote cache.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        service: "gold-price-backend",
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
