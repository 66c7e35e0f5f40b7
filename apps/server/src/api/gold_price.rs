use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{GoldPriceMeta, GoldPriceResponse, UpdateResponse},
};

/// Current cached quote with staleness metadata; 503 until the first successful fetch.
async fn get_gold_price(State(state): State<Arc<AppState>>) -> ApiResult<Json<GoldPriceResponse>> {
    let cache = &state.quote_cache;
    let snapshot = cache.require_snapshot()?;
    let minutes = snapshot.minutes_since(Utc::now());

    Ok(Json(GoldPriceResponse {
        success: true,
        data: snapshot.quote.clone(),
        meta: GoldPriceMeta {
            last_updated: snapshot.last_updated,
            time_since_last_update: minutes,
            next_update_in: cache.next_update_in(Some(minutes)),
            source: format!("{} (Cached)", snapshot.quote.source),
        },
    }))
}

/// Force a refresh and return whatever the cache holds afterwards.
///
/// The refresh runs on its own task so a panicking price source turns into
/// a 500 here instead of tearing down the connection.
async fn update_gold_price(State(state): State<Arc<AppState>>) -> ApiResult<Json<UpdateResponse>> {
    info!("Manual quote update requested");

    let cache = state.quote_cache.clone();
    let quote = tokio::spawn(async move { cache.refresh().await })
        .await
        .map_err(|e| ApiError::UpdateFailed(format!("Refresh task failed: {}", e)))?
        .ok_or(ApiError::CacheUnavailable)?;

    Ok(Json(UpdateResponse {
        success: true,
        data: quote,
        message: "Gold price updated successfully",
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/gold-price", get(get_gold_price))
        .route("/api/gold-price/update", post(update_gold_price))
}
