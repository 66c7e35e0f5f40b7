use chrono::{DateTime, Utc};
use goldquote_market_data::CachedQuote;
use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoldPriceMeta {
    pub last_updated: DateTime<Utc>,
    pub time_since_last_update: u64,
    pub next_update_in: u64,
    pub source: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct GoldPriceResponse {
    pub success: bool,
    pub data: CachedQuote,
    pub meta: GoldPriceMeta,
}

#[derive(Serialize, Debug, Clone)]
pub struct UpdateResponse {
    pub success: bool,
    pub data: CachedQuote,
    pub message: &'static str,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub last_updated: Option<DateTime<Utc>>,
    pub time_since_last_update: Option<u64>,
    pub next_update_in: u64,
    pub cache_status: &'static str,
    pub current_price: Option<f64>,
}
