mod quote;

pub use quote::CachedQuote;
