use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;

use crate::{main_lib::AppState, models::StatusResponse};

/// Operational summary. Always 200, warm or cold.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let cache = &state.quote_cache;
    let snapshot = cache.snapshot();
    let minutes = snapshot.as_ref().map(|s| s.minutes_since(Utc::now()));
    let warm = snapshot.is_some();

    Json(StatusResponse {
        service: "Gold Price Backend",
        version: env!("CARGO_PKG_VERSION"),
        status: if warm { "operational" } else { "initializing" },
        last_updated: snapshot.as_ref().map(|s| s.last_updated),
        time_since_last_update: minutes,
        next_update_in: cache.next_update_in(minutes),
        cache_status: if warm { "warm" } else { "cold" },
        current_price: snapshot.as_ref().map(|s| s.quote.price_per_unit),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/status", get(get_status))
}
