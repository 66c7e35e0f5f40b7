//! Gold Quote Core - the quote cache and its refresh policy.
//!
//! This crate holds the single cached quote, decides when it is stale, and
//! serializes refreshes against an upstream [`PriceSource`]. It owns no timer
//! and no HTTP surface; callers trigger refreshes and read snapshots.
//!
//! [`PriceSource`]: goldquote_market_data::PriceSource

pub mod errors;
pub mod quotes;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
