//! Core error types.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the quote cache.
///
/// Upstream fetch failures are not represented here; they are contained
/// inside a refresh and only logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read happened before any fetch ever succeeded.
    #[error("Quote data not available")]
    CacheUnavailable,
}
