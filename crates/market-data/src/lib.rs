//! Gold Quote Market Data Crate
//!
//! This crate owns everything that talks to the upstream price provider:
//!
//! - [`CachedQuote`] - A single point-in-time price reading
//! - [`FetchError`] - Why a fetch from upstream did not produce a quote
//! - [`PriceSource`] - The seam the cache manager calls to get a fresh quote
//! - [`YahooChartProvider`] - Yahoo Finance v8 chart endpoint implementation
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! | QuoteCacheService| --> |   PriceSource    | --> |  Yahoo chart API |
//! +------------------+     +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   CachedQuote    |
//!                          +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::FetchError;
pub use models::CachedQuote;
pub use provider::yahoo::YahooChartProvider;
pub use provider::PriceSource;
