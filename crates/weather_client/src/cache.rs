//! Time-bounded cache around a single weather lookup.
//!
//! The entry is swapped as a whole under a `RwLock`; the lock is never
//! held while the provider is being called, so concurrent refreshes may
//! race and the last successful write wins.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::{Error, WeatherReading};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::WeatherSource;

/// Default freshness window for a successful reading.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// The last successful reading and when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherCacheEntry {
    pub reading: WeatherReading,
    pub fetched_at_ms: i64,
}

impl WeatherCacheEntry {
    /// A clock that went backwards counts as fresh.
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms - self.fetched_at_ms < ttl_ms
    }
}

/// Weather lookup with a one-hour cache and a silent fallback.
pub struct WeatherCache {
    source: Arc<dyn WeatherSource>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
    entry: RwLock<Option<WeatherCacheEntry>>,
}

impl WeatherCache {
    pub fn new(source: Arc<dyn WeatherSource>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(source, clock, DEFAULT_TTL)
    }

    pub fn with_ttl(source: Arc<dyn WeatherSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            entry: RwLock::new(None),
        }
    }

    /// Current reading. Never fails.
    ///
    /// Issues at most one provider call. A failed refresh returns the
    /// fallback reading for this call only and leaves the previous entry
    /// untouched.
    pub async fn get(&self) -> WeatherReading {
        let now = self.clock.now_ms();

        let cached = self.entry.read().await.clone();
        if let Some(entry) = cached {
            if entry.is_fresh(now, self.ttl_ms) {
                debug!("Using cached weather data (age={}ms)", now - entry.fetched_at_ms);
                return entry.reading;
            }
        }

        info!("Fetching new weather data");
        match self.source.fetch_current().await {
            Ok(reading) => {
                info!(
                    condition = %reading.condition,
                    temperature = %reading.temperature_label,
                    "Fetched weather data"
                );
                *self.entry.write().await = Some(WeatherCacheEntry {
                    reading: reading.clone(),
                    fetched_at_ms: now,
                });
                reading
            }
            Err(Error::ConfigMissing(msg)) => {
                warn!("Weather credential missing ({}), using default weather data", msg);
                WeatherReading::fallback()
            }
            Err(e) => {
                warn!("Failed to fetch weather data: {}. Using default weather data", e);
                WeatherReading::fallback()
            }
        }
    }

    /// Snapshot of the current entry, if any.
    pub async fn entry(&self) -> Option<WeatherCacheEntry> {
        self.entry.read().await.clone()
    }
}
