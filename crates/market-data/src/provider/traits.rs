//! Price source trait definition.

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::CachedQuote;

/// Trait for upstream providers of a single current price reading.
///
/// Implementations perform one fetch-and-parse step and must not keep any
/// cache of their own. The caller bounds the call with its own timeout.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use goldquote_market_data::{CachedQuote, FetchError, PriceSource};
///
/// struct FixedPrice;
///
/// #[async_trait]
/// impl PriceSource for FixedPrice {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_quote(&self) -> Result<CachedQuote, FetchError> {
///         // ... build a quote
///     }
/// }
/// ```
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO".
    ///
    /// Used for logging and the `source` field of returned quotes.
    fn id(&self) -> &'static str;

    /// Fetch the current quote.
    ///
    /// # Returns
    ///
    /// A freshly captured quote, or a [`FetchError`] describing whether the
    /// provider was unreachable or answered with an unusable payload.
    async fn fetch_quote(&self) -> Result<CachedQuote, FetchError>;
}
