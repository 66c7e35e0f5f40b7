//! Yahoo Finance chart API response models.
//!
//! Only the `chart.result[].meta` block is modelled; indicators and
//! timestamps are ignored since we only need the latest reading.

use serde::Deserialize;

/// Main response wrapper for the v8 chart API
#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    pub chart: Option<YahooChart>,
}

/// Chart container. `result` is null when Yahoo reports an error.
#[derive(Debug, Deserialize)]
pub struct YahooChart {
    pub result: Option<Vec<YahooChartResult>>,
    pub error: Option<YahooChartError>,
}

/// Individual chart result
#[derive(Debug, Deserialize)]
pub struct YahooChartResult {
    pub meta: Option<YahooChartMeta>,
}

/// Quote metadata for the charted symbol
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooChartMeta {
    pub currency: Option<String>,
    pub regular_market_price: Option<f64>,
    pub market_state: Option<String>,
    pub previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
}

/// Error block Yahoo returns alongside a null result
#[derive(Debug, Deserialize)]
pub struct YahooChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}
