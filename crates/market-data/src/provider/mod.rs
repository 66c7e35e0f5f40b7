//! Upstream price source abstraction and implementations.
//!
//! The cache manager only knows about [`PriceSource`]. Concrete providers
//! live in submodules; tests substitute their own implementations.

mod traits;

pub mod yahoo;

pub use traits::PriceSource;
