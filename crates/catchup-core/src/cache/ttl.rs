use super::clock::{Clock, SystemClock};
use super::config::CacheConfig;
use super::SummaryCache;
use crate::error::{CatchUpError, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// A cached value and the moment it stops being served.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// State shared between the cache handle and its sweeper task.
struct Store {
    items: RwLock<HashMap<String, CacheEntry>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl Store {
    // Entries are replaced whole, so a poisoned map is still consistent for reads.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.items.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.items.write().unwrap_or_else(|e| e.into_inner())
    }

    fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut items = self.write();
        let before = items.len();
        items.retain(|_, entry| entry.is_live(now));
        before - items.len()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently held, live or not
    pub entries: usize,
    /// Entries past their expiry that the sweep has not removed yet
    pub expired: usize,
}

/// Process-wide summary cache with per-entry expiry.
///
/// Lifecycle is explicit: build with [`TtlCache::start`] (or [`TtlCache::new`]
/// plus [`TtlCache::start_sweeper`]), share behind an `Arc`, and call
/// [`TtlCache::close`] at shutdown. Dropping the last handle also stops the
/// sweeper.
///
/// Readers share a read lock. `set` and the sweep take the write lock for the
/// duration of their mutation only.
pub struct TtlCache {
    store: Arc<Store>,
    sweep_interval: Duration,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl TtlCache {
    /// Create a cache on the wall clock without starting the sweeper.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache on a custom clock without starting the sweeper.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl = chrono::Duration::from_std(config.ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            store: Arc::new(Store {
                items: RwLock::new(HashMap::new()),
                ttl,
                clock,
            }),
            sweep_interval: config.sweep_interval,
            shutdown: Mutex::new(None),
        }
    }

    /// Create a cache and start its background sweep. Must be called from
    /// within a tokio runtime.
    pub fn start(config: CacheConfig) -> Self {
        let cache = Self::new(config);
        cache.start_sweeper();
        cache
    }

    /// Spawn the background sweep task. No-op if one is already running, or
    /// if the interval is too large to schedule.
    pub fn start_sweeper(&self) {
        let mut shutdown = self.shutdown.lock().unwrap_or_else(|e| e.into_inner());
        if shutdown.is_some() {
            return;
        }

        // interval_at panics on a zero period
        let period = self.sweep_interval.max(Duration::from_millis(1));
        let Some(first_tick) = Instant::now().checked_add(period) else {
            warn!(
                "Cache sweep interval {:?} is out of range, sweeper not started",
                period
            );
            return;
        };

        let (tx, mut rx) = oneshot::channel::<()>();
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = store.sweep();
                        if removed > 0 {
                            info!("Cache sweep removed {} expired entries", removed);
                        }
                    }
                    // Fires on an explicit close and when the sender is dropped.
                    _ = &mut rx => {
                        debug!("Cache sweeper stopped");
                        break;
                    }
                }
            }
        });

        *shutdown = Some(tx);
        debug!("Cache sweeper started (interval: {:?})", period);
    }

    /// Stop the background sweep. Safe to call more than once.
    pub fn close(&self) {
        let sender = self
            .shutdown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(tx) = sender {
            // The task may already be gone if the runtime shut down first.
            let _ = tx.send(());
        }
    }

    /// Whether a sweeper has been started and not yet closed.
    pub fn is_sweeping(&self) -> bool {
        self.shutdown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Remove every expired entry now. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.store.sweep()
    }

    /// Number of entries held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let now = self.store.clock.now();
        let items = self.store.read();
        CacheStats {
            entries: items.len(),
            expired: items.values().filter(|e| !e.is_live(now)).count(),
        }
    }

    /// Expiry timestamp of the entry under `key`, live or not.
    pub fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.store.read().get(key).map(|e| e.expires_at)
    }
}

impl SummaryCache for TtlCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = self.store.clock.now();
        let items = self.store.read();
        items
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = self.store.clock.now();
        let expires_at = now
            .checked_add_signed(self.store.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut items = self
            .store
            .items
            .write()
            .map_err(|_| CatchUpError::Cache("cache lock poisoned".to_string()))?;
        items.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}

impl Drop for TtlCache {
    fn drop(&mut self) {
        self.close();
    }
}
