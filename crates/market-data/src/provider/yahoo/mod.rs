//! Yahoo Finance price source.
//!
//! Reads the latest price for one symbol (gold futures, `GC=F`, by default)
//! from the v8 chart endpoint. Only `chart.result[0].meta` is used.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client};
use tracing::debug;

use crate::errors::FetchError;
use crate::models::CachedQuote;
use crate::provider::PriceSource;

use models::{YahooChartMeta, YahooChartResponse};

/// Provider ID constant
const PROVIDER_ID: &str = "YAHOO";

/// Chart endpoint for gold futures
pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/GC=F";

/// Default HTTP request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Yahoo rejects requests without a browser-looking user agent
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Market state used when the chart meta omits it
const UNKNOWN_MARKET_STATE: &str = "UNKNOWN";

/// Yahoo Finance chart provider.
///
/// # Example
///
/// ```ignore
/// use goldquote_market_data::provider::yahoo::{YahooChartProvider, DEFAULT_CHART_URL, DEFAULT_TIMEOUT};
///
/// let provider = YahooChartProvider::new(DEFAULT_CHART_URL, DEFAULT_TIMEOUT);
/// let quote = provider.fetch_quote().await?;
/// ```
pub struct YahooChartProvider {
    client: Client,
    url: String,
}

impl YahooChartProvider {
    /// Create a provider reading from `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for YahooChartProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CHART_URL, DEFAULT_TIMEOUT)
    }
}

/// Parse a chart API body into a quote captured at `captured_at`.
///
/// The price must be present, finite and positive, and a currency must be
/// reported. A missing market state becomes `UNKNOWN`; a missing previous
/// close falls back to `chartPreviousClose`.
pub fn parse_chart_response(
    body: &[u8],
    captured_at: DateTime<Utc>,
) -> Result<CachedQuote, FetchError> {
    let response: YahooChartResponse = serde_json::from_slice(body)
        .map_err(|e| FetchError::malformed(PROVIDER_ID, format!("Invalid JSON: {}", e)))?;

    let chart = response
        .chart
        .ok_or_else(|| FetchError::malformed(PROVIDER_ID, "Missing chart"))?;

    let result = match chart.result {
        Some(results) => results.into_iter().next(),
        None => None,
    };

    let Some(result) = result else {
        let detail = chart
            .error
            .and_then(|e| e.description.or(e.code))
            .unwrap_or_else(|| "no result entries".to_string());
        return Err(FetchError::malformed(
            PROVIDER_ID,
            format!("Missing chart.result: {}", detail),
        ));
    };

    let meta = result
        .meta
        .ok_or_else(|| FetchError::malformed(PROVIDER_ID, "Missing chart.result[0].meta"))?;

    meta_to_quote(meta, captured_at)
}

fn meta_to_quote(meta: YahooChartMeta, captured_at: DateTime<Utc>) -> Result<CachedQuote, FetchError> {
    let price = meta
        .regular_market_price
        .ok_or_else(|| FetchError::malformed(PROVIDER_ID, "Missing regularMarketPrice"))?;

    if !price.is_finite() || price <= 0.0 {
        return Err(FetchError::malformed(
            PROVIDER_ID,
            format!("Invalid regularMarketPrice: {}", price),
        ));
    }

    let currency = meta
        .currency
        .filter(|c| !c.is_empty())
        .ok_or_else(|| FetchError::malformed(PROVIDER_ID, "Missing currency"))?;

    Ok(CachedQuote::new(
        price,
        captured_at,
        meta.market_state
            .unwrap_or_else(|| UNKNOWN_MARKET_STATE.to_string()),
        meta.previous_close.or(meta.chart_previous_close),
        currency,
        PROVIDER_ID.to_string(),
    ))
}

#[async_trait]
impl PriceSource for YahooChartProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quote(&self) -> Result<CachedQuote, FetchError> {
        debug!(url = %self.url, "Requesting Yahoo chart");

        let response = self
            .client
            .get(&self.url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::network(PROVIDER_ID, "Request timed out")
                } else {
                    FetchError::network(PROVIDER_ID, e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::network(
                PROVIDER_ID,
                format!("Unexpected HTTP status {}", status),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(PROVIDER_ID, e.to_string()))?;

        parse_chart_response(&body, Utc::now())
    }
}
