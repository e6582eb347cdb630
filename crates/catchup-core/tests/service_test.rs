use async_trait::async_trait;
use catchup_core::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ── Test doubles ─────────────────────────────────────────────────────────────

/// Generator that returns a fixed reply and counts calls.
struct FixedGenerator {
    reply: std::result::Result<String, &'static str>,
    calls: AtomicUsize,
    delay: Duration,
}

impl FixedGenerator {
    fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        })
    }

    fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    fn failing(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummaryGenerator for FixedGenerator {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn generate(
        &self,
        _industry: &str,
        _time_period: &str,
    ) -> std::result::Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(GenerationError::Provider {
                provider: "fixed",
                message: message.to_string(),
            }),
        }
    }
}

/// Generator whose every call fails at the transport layer.
struct UnreachableGenerator {
    inner: ClaudeGenerator,
    calls: AtomicUsize,
}

#[async_trait]
impl SummaryGenerator for UnreachableGenerator {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn generate(
        &self,
        industry: &str,
        time_period: &str,
    ) -> std::result::Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(industry, time_period).await
    }
}

/// Cache that never holds anything and refuses every write.
#[derive(Default)]
struct BrokenCache {
    writes: AtomicUsize,
}

impl SummaryCache for BrokenCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(CatchUpError::Cache("disk on fire".to_string()))
    }
}

/// Wraps a real cache and counts writes.
struct CountingCache {
    inner: TtlCache,
    writes: AtomicUsize,
}

impl CountingCache {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: TtlCache::new(CacheConfig::default()),
            writes: AtomicUsize::new(0),
        })
    }
}

impl SummaryCache for CountingCache {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

// ── Cache-then-backend ordering ──────────────────────────────────────────────

#[tokio::test]
async fn test_second_call_served_from_cache() {
    init_logging();
    let generator = FixedGenerator::ok("SUMMARY-A");
    let cache = Arc::new(TtlCache::new(CacheConfig::default()));
    let service = CatchUpService::new(cache.clone(), generator.clone());

    let first = service.handle("legal", "1-year").await.unwrap();
    assert_eq!(first.summary, "SUMMARY-A");
    assert!(!first.cached);
    assert_eq!(first.industry, "Legal");
    assert_eq!(first.period, "1 year");
    assert_eq!(generator.calls(), 1);

    let second = service.handle("legal", "1-year").await.unwrap();
    assert_eq!(second.summary, "SUMMARY-A");
    assert!(second.cached);
    assert_eq!(generator.calls(), 1, "cache hit must not call the generator");
}

#[tokio::test]
async fn test_different_keys_do_not_share_entries() {
    let generator = FixedGenerator::ok("SUMMARY-B");
    let service = CatchUpService::new(
        Arc::new(TtlCache::new(CacheConfig::default())),
        generator.clone(),
    );

    service.handle("legal", "1-year").await.unwrap();
    let other = service.handle("legal", "5-years").await.unwrap();
    assert!(!other.cached);
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_expired_entry_triggers_regeneration() {
    let clock = Arc::new(ManualClock::default());
    let cache = Arc::new(TtlCache::with_clock(CacheConfig::default(), clock.clone()));
    let generator = FixedGenerator::ok("SUMMARY-C");
    let service = CatchUpService::new(cache, generator.clone());

    service.handle("marketing", "2-3-years").await.unwrap();
    clock.advance(chrono::Duration::days(7));

    let again = service.handle("marketing", "2-3-years").await.unwrap();
    assert!(!again.cached);
    assert_eq!(generator.calls(), 2);
}

// ── Best-effort write-through ────────────────────────────────────────────────

#[tokio::test]
async fn test_cache_write_failure_is_not_fatal() {
    init_logging();
    let generator = FixedGenerator::ok("FRESH");
    let cache = Arc::new(BrokenCache::default());
    let service = CatchUpService::new(cache.clone(), generator.clone());

    let resp = service.handle("healthcare", "10-years").await.unwrap();
    assert_eq!(resp.summary, "FRESH");
    assert!(!resp.cached);
    assert_eq!(cache.writes.load(Ordering::SeqCst), 1);

    // Nothing was stored, so the next call generates again
    let resp = service.handle("healthcare", "10-years").await.unwrap();
    assert!(!resp.cached);
    assert_eq!(generator.calls(), 2);
}

// ── Generation failures ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_transport_error_surfaces_as_generation_error() {
    let generator = Arc::new(UnreachableGenerator {
        inner: ClaudeGenerator::new(
            "key",
            GeneratorOptions::new().with_timeout(Duration::from_secs(5)),
        )
        .unwrap()
        .with_endpoint("http://127.0.0.1:1/v1/messages"),
        calls: AtomicUsize::new(0),
    });
    let cache = CountingCache::new();
    let service = CatchUpService::new(cache.clone(), generator.clone());

    let err = service.handle("legal", "1-year").await.unwrap_err();
    assert!(!err.is_validation());
    match &err {
        CatchUpError::Generation(inner) => assert!(inner.is_transport()),
        other => panic!("expected generation error, got {:?}", other),
    }
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_provider_error_is_not_cached() {
    let generator = FixedGenerator::failing("quota exceeded");
    let cache = CountingCache::new();
    let service = CatchUpService::new(cache.clone(), generator.clone());

    let err = service.handle("marketing", "1-year").await.unwrap_err();
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(cache.writes.load(Ordering::SeqCst), 0);
    assert_eq!(cache.get("marketing:1-year"), None);
}

// ── Concurrency ──────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_are_not_coalesced() {
    let generator = FixedGenerator::slow("SLOW", Duration::from_millis(100));
    let cache = CountingCache::new();
    let service = CatchUpService::new(cache.clone(), generator.clone());

    let results = futures::future::join_all((0..4).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.handle("legal", "6-months").await })
    }))
    .await;

    for result in results {
        let resp = result.unwrap().unwrap();
        assert_eq!(resp.summary, "SLOW");
        assert!(!resp.cached);
    }
    assert_eq!(generator.calls(), 4);
    assert_eq!(cache.writes.load(Ordering::SeqCst), 4);
    assert_eq!(cache.get("legal:6-months").as_deref(), Some("SLOW"));
}

// ── Cancellation ─────────────────────────────────────────────────────────────

/// Sets its flag when dropped, whether or not the call completed.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Generator that stalls far longer than any caller waits.
#[derive(Default)]
struct StallingGenerator {
    dropped: Arc<AtomicBool>,
    finished: AtomicBool,
}

#[async_trait]
impl SummaryGenerator for StallingGenerator {
    fn name(&self) -> &str {
        "stalling"
    }

    async fn generate(
        &self,
        _industry: &str,
        _time_period: &str,
    ) -> std::result::Result<String, GenerationError> {
        let _guard = DropFlag(self.dropped.clone());
        tokio::time::sleep(Duration::from_secs(10)).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok("too late".to_string())
    }
}

#[tokio::test]
async fn test_abandoned_request_drops_generation_without_caching() {
    let generator = Arc::new(StallingGenerator::default());
    let cache = CountingCache::new();
    let service = CatchUpService::new(cache.clone(), generator.clone());

    let outcome =
        tokio::time::timeout(Duration::from_millis(50), service.handle("legal", "1-year")).await;
    assert!(outcome.is_err(), "caller should have given up first");

    assert!(generator.dropped.load(Ordering::SeqCst));
    assert!(!generator.finished.load(Ordering::SeqCst));
    assert_eq!(cache.writes.load(Ordering::SeqCst), 0);
    assert!(cache.inner.is_empty());
}

// ── Validation closure ───────────────────────────────────────────────────────

fn rejected(industry: &str, period: &str) -> (CatchUpError, usize, usize) {
    let generator = FixedGenerator::ok("never");
    let cache = CountingCache::new();
    let service = CatchUpService::new(cache.clone(), generator.clone());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let err = runtime
        .block_on(service.handle(industry, period))
        .expect_err("input outside the catalog must be rejected");
    (err, generator.calls(), cache.writes.load(Ordering::SeqCst))
}

proptest! {
    #[test]
    fn prop_unknown_industry_rejected_without_side_effects(industry in ".*") {
        prop_assume!(industry.parse::<Industry>().is_err());

        let (err, calls, writes) = rejected(&industry, "1-year");
        prop_assert!(matches!(err, CatchUpError::InvalidIndustry(_)));
        prop_assert!(err.is_validation());
        prop_assert_eq!(calls, 0);
        prop_assert_eq!(writes, 0);
    }

    #[test]
    fn prop_unknown_period_rejected_without_side_effects(period in "[a-z0-9-]{0,12}") {
        prop_assume!(period.parse::<TimePeriod>().is_err());

        let (err, calls, writes) = rejected("legal", &period);
        prop_assert!(matches!(err, CatchUpError::InvalidTimePeriod(_)));
        prop_assert_eq!(calls, 0);
        prop_assert_eq!(writes, 0);
    }
}

#[test]
fn test_near_miss_industries_rejected() {
    for industry in ["Legal", "legal ", "software_development", "", "legal:1-year"] {
        let (err, calls, writes) = rejected(industry, "1-year");
        assert!(err.is_validation(), "{:?} accepted", industry);
        assert_eq!((calls, writes), (0, 0));
    }
}
