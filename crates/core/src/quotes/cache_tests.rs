//! Tests for QuoteCacheService refresh and staleness behaviour.
//!
//! # Contract Points
//!
//! 1. A cold cache reports no quote and no staleness
//! 2. A successful refresh replaces the quote as one unit
//! 3. A failed refresh never clears or alters the cached quote
//! 4. Concurrent refreshes collapse into a single upstream call
//! 5. Staleness thresholds are inclusive at the interval boundary

#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::quotes::cache::{CacheConfig, QuoteCacheService};
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use goldquote_market_data::{CachedQuote, FetchError, PriceSource};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Notify;

    // =========================================================================
    // Mock PriceSource
    // =========================================================================

    /// Replays queued responses in order. An empty queue is a network failure.
    #[derive(Default)]
    struct MockPriceSource {
        call_count: AtomicUsize,
        responses: Mutex<VecDeque<Result<CachedQuote, FetchError>>>,
        delay: Option<Duration>,
        gate: Option<Gate>,
    }

    /// Lets a test hold a fetch open until it decides to release it.
    struct Gate {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl MockPriceSource {
        fn new() -> Self {
            Self::default()
        }

        fn with_responses(responses: Vec<Result<CachedQuote, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Self::default()
            }
        }

        fn push(&self, response: Result<CachedQuote, FetchError>) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceSource for MockPriceSource {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn fetch_quote(&self) -> Result<CachedQuote, FetchError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            if let Some(gate) = &self.gate {
                gate.started.notify_one();
                gate.release.notified().await;
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::network("MOCK", "no response queued")))
        }
    }

    fn quote(price: f64, market_state: &str, previous_close: Option<f64>) -> CachedQuote {
        CachedQuote::new(
            price,
            Utc::now(),
            market_state.to_string(),
            previous_close,
            "USD".to_string(),
            "MOCK".to_string(),
        )
    }

    fn service(source: Arc<MockPriceSource>) -> QuoteCacheService {
        QuoteCacheService::new(source, CacheConfig::default())
    }

    // =========================================================================
    // Cold cache
    // =========================================================================

    #[test]
    fn test_cold_cache_is_empty() {
        let svc = service(Arc::new(MockPriceSource::new()));

        assert!(svc.get_current_snapshot().is_none());
        assert!(svc.last_updated().is_none());
        assert_eq!(svc.minutes_since_last_update(), None);
        assert!(svc.needs_refresh());
        assert_eq!(svc.require_snapshot().unwrap_err(), Error::CacheUnavailable);
    }

    #[test]
    fn test_cold_cache_next_update_is_full_interval() {
        let svc = service(Arc::new(MockPriceSource::new()));
        assert_eq!(svc.next_update_in_minutes(), 5);
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    #[tokio::test]
    async fn test_initialize_populates_cache() {
        let source = Arc::new(MockPriceSource::with_responses(vec![Ok(quote(
            2350.5,
            "REGULAR",
            Some(2340.0),
        ))]));
        let svc = service(source.clone());

        let returned = svc.initialize().await.unwrap();
        let cached = svc.get_current_snapshot().unwrap();

        assert_eq!(returned, cached);
        assert_eq!(cached.price_per_unit, 2350.5);
        assert_eq!(source.calls(), 1);
        assert!(svc.last_updated().is_some());
        assert_eq!(svc.minutes_since_last_update(), Some(0));
        assert!(!svc.needs_refresh());
    }

    #[tokio::test]
    async fn test_initialize_with_failing_source_leaves_cache_cold() {
        let source = Arc::new(MockPriceSource::new());
        let svc = service(source.clone());

        assert!(svc.initialize().await.is_none());
        assert!(svc.get_current_snapshot().is_none());
        assert!(svc.last_updated().is_none());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_replaces_quote_as_a_whole() {
        let source = Arc::new(MockPriceSource::with_responses(vec![
            Ok(quote(2350.5, "REGULAR", Some(2340.0))),
            Ok(quote(2361.0, "CLOSED", None)),
        ]));
        let svc = service(source.clone());

        svc.refresh().await;
        let second = quote(2361.0, "CLOSED", None);
        let cached = svc.refresh().await.unwrap();

        // Nothing from the first quote survives, including the absent previous close
        assert_eq!(cached.price_per_unit, second.price_per_unit);
        assert_eq!(cached.market_state, "CLOSED");
        assert_eq!(cached.previous_close, None);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_preserves_prior_quote() {
        let source = Arc::new(MockPriceSource::with_responses(vec![Ok(quote(
            2350.5,
            "REGULAR",
            Some(2340.0),
        ))]));
        let svc = service(source.clone());

        svc.refresh().await;
        let before = svc.snapshot().unwrap();

        source.push(Err(FetchError::network("MOCK", "connection reset")));
        let returned = svc.refresh().await.unwrap();

        let after = svc.snapshot().unwrap();
        assert_eq!(*after, *before);
        assert_eq!(returned, before.quote);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_response_preserves_prior_quote() {
        let source = Arc::new(MockPriceSource::with_responses(vec![
            Ok(quote(2350.5, "REGULAR", Some(2340.0))),
            Err(FetchError::malformed("MOCK", "Missing chart.result")),
        ]));
        let svc = service(source.clone());

        svc.refresh().await;
        let before = svc.snapshot().unwrap();
        svc.refresh().await;

        assert_eq!(*svc.snapshot().unwrap(), *before);
    }

    #[tokio::test]
    async fn test_fetch_from_upstream_does_not_touch_cache() {
        let source = Arc::new(MockPriceSource::with_responses(vec![Ok(quote(
            2350.5, "REGULAR", None,
        ))]));
        let svc = service(source.clone());

        let fetched = svc.fetch_from_upstream().await.unwrap();

        assert_eq!(fetched.price_per_unit, 2350.5);
        assert!(svc.get_current_snapshot().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_upstream_times_out_as_network_error() {
        let source = Arc::new(MockPriceSource {
            delay: Some(Duration::from_secs(60)),
            ..MockPriceSource::with_responses(vec![Ok(quote(2350.5, "REGULAR", None))])
        });
        let svc = service(source.clone());

        let err = svc.fetch_from_upstream().await.unwrap_err();

        assert!(matches!(err, FetchError::Network { .. }));
        assert!(err.to_string().contains("Timed out after 10000ms"));
        assert!(svc.get_current_snapshot().is_none());
    }

    // =========================================================================
    // Mutual exclusion
    // =========================================================================

    #[tokio::test]
    async fn test_concurrent_refreshes_make_one_upstream_call() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let source = Arc::new(MockPriceSource {
            gate: Some(Gate {
                started: started.clone(),
                release: release.clone(),
            }),
            ..MockPriceSource::with_responses(vec![Ok(quote(2361.0, "REGULAR", None))])
        });
        let svc = Arc::new(service(source.clone()));

        let in_flight = tokio::spawn({
            let svc = svc.clone();
            async move { svc.refresh().await }
        });
        started.notified().await;

        // Cache is still cold while the first refresh is held open
        for _ in 0..5 {
            assert!(svc.refresh().await.is_none());
        }
        assert_eq!(source.calls(), 1);

        release.notify_one();
        let refreshed = in_flight.await.unwrap().unwrap();

        assert_eq!(refreshed.price_per_unit, 2361.0);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_skipped_refresh_returns_pre_existing_quote() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let source = Arc::new(MockPriceSource {
            gate: Some(Gate {
                started: started.clone(),
                release: release.clone(),
            }),
            ..MockPriceSource::with_responses(vec![
                Ok(quote(2350.5, "REGULAR", None)),
                Ok(quote(2361.0, "REGULAR", None)),
            ])
        });
        let svc = Arc::new(service(source.clone()));

        // First refresh: let it through straight away
        release.notify_one();
        svc.refresh().await;
        started.notified().await;

        let in_flight = tokio::spawn({
            let svc = svc.clone();
            async move { svc.refresh().await }
        });
        started.notified().await;

        let during = svc.refresh().await.unwrap();
        assert_eq!(during.price_per_unit, 2350.5);

        release.notify_one();
        in_flight.await.unwrap();

        assert_eq!(svc.get_current_snapshot().unwrap().price_per_unit, 2361.0);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_lock_released_after_failure() {
        let source = Arc::new(MockPriceSource::with_responses(vec![
            Err(FetchError::network("MOCK", "down")),
            Ok(quote(2350.5, "REGULAR", None)),
        ]));
        let svc = service(source.clone());

        assert!(svc.refresh().await.is_none());
        assert_eq!(svc.refresh().await.unwrap().price_per_unit, 2350.5);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_reads_do_not_wait_for_in_flight_refresh() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let source = Arc::new(MockPriceSource {
            gate: Some(Gate {
                started: started.clone(),
                release: release.clone(),
            }),
            ..MockPriceSource::with_responses(vec![Ok(quote(2350.5, "REGULAR", None))])
        });
        let svc = Arc::new(service(source.clone()));

        let in_flight = tokio::spawn({
            let svc = svc.clone();
            async move { svc.refresh().await }
        });
        started.notified().await;

        assert!(svc.get_current_snapshot().is_none());
        assert!(svc.needs_refresh());
        assert_eq!(svc.minutes_since_last_update(), None);

        release.notify_one();
        in_flight.await.unwrap();
        assert!(svc.get_current_snapshot().is_some());
    }

    // =========================================================================
    // Staleness
    // =========================================================================

    async fn warm_service() -> QuoteCacheService {
        let source = Arc::new(MockPriceSource::with_responses(vec![Ok(quote(
            2350.5, "REGULAR", None,
        ))]));
        let svc = service(source);
        svc.refresh().await;
        svc
    }

    #[tokio::test]
    async fn test_needs_refresh_threshold() {
        let svc = warm_service().await;
        let last_updated = svc.last_updated().unwrap();

        let just_before = last_updated + ChronoDuration::minutes(4) + ChronoDuration::seconds(59);
        let at_interval = last_updated + ChronoDuration::minutes(5);
        let well_after = last_updated + ChronoDuration::minutes(42);

        assert!(!svc.needs_refresh_at(just_before));
        assert!(svc.needs_refresh_at(at_interval));
        assert!(svc.needs_refresh_at(well_after));
    }

    #[tokio::test]
    async fn test_minutes_since_last_update_truncates() {
        let svc = warm_service().await;
        let last_updated = svc.last_updated().unwrap();

        let now = last_updated + ChronoDuration::seconds(125);
        assert_eq!(svc.minutes_since_last_update_at(now), Some(2));

        let now = last_updated + ChronoDuration::seconds(59);
        assert_eq!(svc.minutes_since_last_update_at(now), Some(0));
    }

    #[tokio::test]
    async fn test_clock_going_backwards_counts_as_fresh() {
        let svc = warm_service().await;
        let last_updated = svc.last_updated().unwrap();

        let earlier = last_updated - ChronoDuration::minutes(3);
        assert_eq!(svc.minutes_since_last_update_at(earlier), Some(0));
        assert!(!svc.needs_refresh_at(earlier));
    }

    #[tokio::test]
    async fn test_next_update_in_is_clamped_at_zero() {
        let svc = warm_service().await;
        let last_updated = svc.last_updated().unwrap();

        assert_eq!(svc.next_update_in_minutes_at(last_updated), 5);
        assert_eq!(
            svc.next_update_in_minutes_at(last_updated + ChronoDuration::seconds(125)),
            3
        );
        assert_eq!(
            svc.next_update_in_minutes_at(last_updated + ChronoDuration::minutes(12)),
            0
        );
    }

    #[tokio::test]
    async fn test_custom_refresh_interval() {
        let source = Arc::new(MockPriceSource::with_responses(vec![Ok(quote(
            2350.5, "REGULAR", None,
        ))]));
        let svc = QuoteCacheService::new(
            source,
            CacheConfig {
                refresh_interval: Duration::from_secs(15 * 60),
                ..CacheConfig::default()
            },
        );
        svc.refresh().await;
        let last_updated = svc.last_updated().unwrap();

        assert_eq!(svc.refresh_interval_minutes(), 15);
        assert!(!svc.needs_refresh_at(last_updated + ChronoDuration::minutes(10)));
        assert_eq!(
            svc.next_update_in_minutes_at(last_updated + ChronoDuration::minutes(10)),
            5
        );
    }
}
