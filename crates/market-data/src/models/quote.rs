use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest price reading fetched from an upstream provider.
///
/// Immutable once built. The cache replaces it as a whole, never field by field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedQuote {
    /// Current price per unit (troy ounce for gold), always positive
    pub price_per_unit: f64,

    /// When this reading was fetched from upstream
    pub captured_at: DateTime<Utc>,

    /// Market state reported by the provider (REGULAR, CLOSED, ...)
    pub market_state: String,

    /// Previous session close, when the provider reports one
    pub previous_close: Option<f64>,

    /// Quote currency
    pub currency_code: String,

    /// Provider the quote came from (YAHOO, ...)
    pub source: String,
}

impl CachedQuote {
    pub fn new(
        price_per_unit: f64,
        captured_at: DateTime<Utc>,
        market_state: String,
        previous_close: Option<f64>,
        currency_code: String,
        source: String,
    ) -> Self {
        Self {
            price_per_unit,
            captured_at,
            market_state,
            previous_close,
            currency_code,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_quote_serializes_camel_case() {
        let quote = CachedQuote::new(
            2350.5,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            "REGULAR".to_string(),
            None,
            "USD".to_string(),
            "YAHOO".to_string(),
        );

        let value = serde_json::to_value(&quote).unwrap();
        assert_eq!(value["pricePerUnit"], 2350.5);
        assert_eq!(value["capturedAt"], "2024-05-01T12:00:00Z");
        assert_eq!(value["marketState"], "REGULAR");
        assert!(value["previousClose"].is_null());
        assert_eq!(value["currencyCode"], "USD");
    }
}
