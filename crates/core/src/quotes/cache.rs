//! Single-value quote cache with serialized refreshes.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use goldquote_market_data::{CachedQuote, FetchError, PriceSource};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::constants::{DEFAULT_FETCH_TIMEOUT, DEFAULT_REFRESH_INTERVAL};
use crate::errors::{Error, Result};

/// Cache configuration.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Interval after which the cached quote counts as stale.
    pub refresh_interval: Duration,
    /// Upper bound on one upstream fetch.
    pub fetch_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// The cached quote together with the time it was stored.
///
/// Both fields are written in one swap, so `last_updated` exists exactly
/// when a quote does.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheSnapshot {
    pub quote: CachedQuote,
    pub last_updated: DateTime<Utc>,
}

impl CacheSnapshot {
    /// Whole minutes between `last_updated` and `now`, truncated.
    pub fn minutes_since(&self, now: DateTime<Utc>) -> u64 {
        elapsed(self.last_updated, now).as_secs() / 60
    }
}

/// Holds the most recent successful quote and coordinates refreshes.
///
/// Readers take the `current` lock only long enough to clone an `Arc`, so
/// they never wait on an in-flight upstream call. `refresh_lock` is only ever
/// acquired with `try_lock`: a second refresh arriving while one is running
/// returns the cached value instead of queueing.
pub struct QuoteCacheService {
    source: Arc<dyn PriceSource>,
    config: CacheConfig,
    current: RwLock<Option<Arc<CacheSnapshot>>>,
    refresh_lock: Mutex<()>,
}

impl QuoteCacheService {
    pub fn new(source: Arc<dyn PriceSource>, config: CacheConfig) -> Self {
        Self {
            source,
            config,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn with_defaults(source: Arc<dyn PriceSource>) -> Self {
        Self::new(source, CacheConfig::default())
    }

    /// Populate the cache once at startup, regardless of staleness.
    ///
    /// Callers must not start serving reads until this returns.
    pub async fn initialize(&self) -> Option<CachedQuote> {
        info!(provider = self.source.id(), "Initializing quote cache");
        self.refresh().await
    }

    /// Fetch one quote from upstream, bounded by the configured timeout.
    ///
    /// Does not touch the cache.
    pub async fn fetch_from_upstream(&self) -> std::result::Result<CachedQuote, FetchError> {
        match tokio::time::timeout(self.config.fetch_timeout, self.source.fetch_quote()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::network(
                self.source.id(),
                format!(
                    "Timed out after {}ms",
                    self.config.fetch_timeout.as_millis()
                ),
            )),
        }
    }

    /// Fetch a new quote and, on success, replace the cached one.
    ///
    /// Returns the cached quote after the attempt. A failed fetch leaves the
    /// cache untouched. If another refresh is already running this returns
    /// the current value immediately without calling upstream.
    pub async fn refresh(&self) -> Option<CachedQuote> {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            info!("Quote refresh already in progress, skipping");
            return self.get_current_snapshot();
        };

        debug!(provider = self.source.id(), "Refreshing quote");

        match self.fetch_from_upstream().await {
            Ok(quote) => {
                info!(
                    provider = %quote.source,
                    price = quote.price_per_unit,
                    currency = %quote.currency_code,
                    "Quote refreshed"
                );
                self.store(CacheSnapshot {
                    quote,
                    last_updated: Utc::now(),
                });
            }
            Err(e) => {
                warn!(
                    provider = e.provider(),
                    kind = e.kind(),
                    error = %e,
                    "Quote refresh failed, keeping cached value"
                );
            }
        }

        self.get_current_snapshot()
    }

    fn store(&self, snapshot: CacheSnapshot) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(snapshot));
    }

    /// The cached quote and its update time, if any fetch has succeeded.
    pub fn snapshot(&self) -> Option<Arc<CacheSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Like [`snapshot`](Self::snapshot), but a cold cache is an error.
    pub fn require_snapshot(&self) -> Result<Arc<CacheSnapshot>> {
        self.snapshot().ok_or(Error::CacheUnavailable)
    }

    pub fn get_current_snapshot(&self) -> Option<CachedQuote> {
        self.snapshot().map(|s| s.quote.clone())
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.snapshot().map(|s| s.last_updated)
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh_at(Utc::now())
    }

    /// True when nothing is cached or the interval has fully elapsed at `now`.
    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.last_updated() {
            Some(last_updated) => elapsed(last_updated, now) >= self.config.refresh_interval,
            None => true,
        }
    }

    pub fn minutes_since_last_update(&self) -> Option<u64> {
        self.minutes_since_last_update_at(Utc::now())
    }

    /// Whole minutes since the last successful refresh, truncated.
    pub fn minutes_since_last_update_at(&self, now: DateTime<Utc>) -> Option<u64> {
        self.snapshot().map(|s| s.minutes_since(now))
    }

    pub fn next_update_in_minutes(&self) -> u64 {
        self.next_update_in_minutes_at(Utc::now())
    }

    /// Minutes until the next scheduled refresh, clamped at zero.
    ///
    /// A cold cache reports the full interval.
    pub fn next_update_in_minutes_at(&self, now: DateTime<Utc>) -> u64 {
        self.next_update_in(self.minutes_since_last_update_at(now))
    }

    /// Next-refresh hint for a given staleness: `max(0, interval - minutes)`.
    pub fn next_update_in(&self, minutes_since_last_update: Option<u64>) -> u64 {
        self.refresh_interval_minutes()
            .saturating_sub(minutes_since_last_update.unwrap_or(0))
    }

    pub fn refresh_interval(&self) -> Duration {
        self.config.refresh_interval
    }

    pub fn refresh_interval_minutes(&self) -> u64 {
        self.config.refresh_interval.as_secs() / 60
    }

    pub fn source_id(&self) -> &'static str {
        self.source.id()
    }
}

/// Time from `since` to `now`; a clock that went backwards counts as zero.
fn elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - since).to_std().unwrap_or(Duration::ZERO)
}
