//! Quote cache module.
//!
//! - [`cache`] - The cache service: refresh coordination and staleness
//! - [`constants`] - Default interval and timeout
//!
//! ```text
//! scheduler / POST update ──> QuoteCacheService::refresh ──> PriceSource
//! HTTP read handlers      ──> QuoteCacheService::snapshot
//! ```

pub mod cache;
pub mod constants;

#[cfg(test)]
mod cache_tests;

pub use cache::{CacheConfig, CacheSnapshot, QuoteCacheService};
pub use constants::{DEFAULT_FETCH_TIMEOUT, DEFAULT_REFRESH_INTERVAL};
