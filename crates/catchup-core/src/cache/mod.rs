//! In-memory summary cache with time-to-live expiry and a background sweep.

pub mod clock;
pub mod config;
pub mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use ttl::{CacheStats, TtlCache};

use crate::error::Result;

/// Key/value store the catch-up service reads from and writes through to.
pub trait SummaryCache: Send + Sync {
    /// Look up a live entry. `None` means absent or expired; a stored empty
    /// string comes back as `Some("")`.
    fn get(&self, key: &str) -> Option<String>;

    /// Insert or overwrite an entry, restarting its time-to-live.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<C: SummaryCache + ?Sized> SummaryCache for std::sync::Arc<C> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
