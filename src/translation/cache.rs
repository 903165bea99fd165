/*!
 * Capability metadata caching.
 *
 * The provider's supported-language lists change rarely, so each direction
 * is fetched once and kept for a fixed time-to-live. A lookup is always a
 * tagged `CacheLookup`: a cached empty list is a hit and must not trigger
 * a refetch. Failed fetches are never stored.
 */

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::database::{CacheEntryRecord, Repository};
use crate::language_utils::{normalize_code, Direction};
use crate::providers::{CapabilityEntry, ProviderClient};
use crate::translation::concurrency::KeyedLocks;

/// Default time-to-live of a capability record
pub const DEFAULT_CAPABILITY_TTL_SECS: i64 = 24 * 60 * 60;

/// Result of a cache read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    /// A fresh value, possibly empty
    Hit(T),
    /// Absent or expired
    Miss,
}

/// Source of the current time, swappable for expiry tests
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Key-value storage with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read `identifier`, treating entries expired at `now` as missing
    async fn get(&self, identifier: &str, now: DateTime<Utc>) -> Result<CacheLookup<String>>;

    /// Write `identifier`, replacing any previous value
    async fn set(&self, identifier: &str, payload: String, expires_at: DateTime<Utc>) -> Result<()>;

    /// Drop `identifier`; returns whether something was removed
    async fn remove(&self, identifier: &str) -> Result<bool>;
}

/// Process-local cache store
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, (String, DateTime<Utc>)>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, identifier: &str, now: DateTime<Utc>) -> Result<CacheLookup<String>> {
        let entries = self.entries.read();
        Ok(match entries.get(identifier) {
            Some((payload, expires_at)) if now < *expires_at => CacheLookup::Hit(payload.clone()),
            _ => CacheLookup::Miss,
        })
    }

    async fn set(&self, identifier: &str, payload: String, expires_at: DateTime<Utc>) -> Result<()> {
        self.entries
            .write()
            .insert(identifier.to_string(), (payload, expires_at));
        Ok(())
    }

    async fn remove(&self, identifier: &str) -> Result<bool> {
        Ok(self.entries.write().remove(identifier).is_some())
    }
}

#[async_trait]
impl CacheStore for Repository {
    async fn get(&self, identifier: &str, now: DateTime<Utc>) -> Result<CacheLookup<String>> {
        let entry = self.get_cache_entry(identifier).await?;
        Ok(match entry {
            Some(record) if record.is_fresh(now.timestamp()) => CacheLookup::Hit(record.payload),
            _ => CacheLookup::Miss,
        })
    }

    async fn set(&self, identifier: &str, payload: String, expires_at: DateTime<Utc>) -> Result<()> {
        let record = CacheEntryRecord::new(identifier, payload, expires_at.timestamp());
        self.set_cache_entry(&record).await
    }

    async fn remove(&self, identifier: &str) -> Result<bool> {
        self.delete_cache_entry(identifier).await
    }
}

/// Hit/miss counters of a `CapabilityCache`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Read-through cache of the provider's supported languages
pub struct CapabilityCache {
    /// Provider used on a miss
    provider: Arc<ProviderClient>,
    /// Backing storage
    store: Arc<dyn CacheStore>,
    /// Time source for expiry
    clock: Arc<dyn Clock>,
    /// Lifetime of a stored record
    ttl: Duration,
    /// One in-flight fetch per direction
    locks: KeyedLocks<Direction>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl CapabilityCache {
    /// Create a cache with the default TTL and the wall clock
    pub fn new(provider: Arc<ProviderClient>, store: Arc<dyn CacheStore>) -> Self {
        Self {
            provider,
            store,
            clock: Arc::new(SystemClock),
            ttl: Duration::seconds(DEFAULT_CAPABILITY_TTL_SECS),
            locks: KeyedLocks::new(),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Storage key of a direction's record
    pub fn cache_identifier(direction: Direction) -> String {
        format!("deepl-supported-languages-{}", direction)
    }

    /// Capability entries for a direction, fetching on miss or expiry
    ///
    /// A failed fetch yields an empty list and leaves the store untouched,
    /// so the next call tries the provider again.
    pub async fn get_capabilities(&self, direction: Direction) -> Vec<CapabilityEntry> {
        if let CacheLookup::Hit(entries) = self.lookup(direction).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Capability cache hit for {} ({} entries)", direction, entries.len());
            return entries;
        }

        let _guard = self.locks.lock(&direction).await;

        // Another caller may have filled the record while we waited
        if let CacheLookup::Hit(entries) = self.lookup(direction).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Capability cache filled concurrently for {}", direction);
            return entries;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Capability cache miss for {}", direction);

        match self.provider.fetch_languages(direction).await {
            Ok(entries) => {
                if let Err(e) = self.store_entries(direction, &entries).await {
                    warn!("Failed to cache {} languages: {:#}", direction, e);
                }
                entries
            }
            Err(e) => {
                warn!("Using empty {} language list: {}", direction, e);
                Vec::new()
            }
        }
    }

    /// Read the cached record for a direction without fetching
    pub async fn lookup(&self, direction: Direction) -> CacheLookup<Vec<CapabilityEntry>> {
        let identifier = Self::cache_identifier(direction);
        let payload = match self.store.get(&identifier, self.clock.now()).await {
            Ok(CacheLookup::Hit(payload)) => payload,
            Ok(CacheLookup::Miss) => return CacheLookup::Miss,
            Err(e) => {
                warn!("Failed to read capability cache {}: {:#}", identifier, e);
                return CacheLookup::Miss;
            }
        };

        match serde_json::from_str::<Vec<CapabilityEntry>>(&payload) {
            Ok(entries) => CacheLookup::Hit(entries),
            Err(e) => {
                warn!("Discarding unreadable capability cache {}: {}", identifier, e);
                CacheLookup::Miss
            }
        }
    }

    async fn store_entries(&self, direction: Direction, entries: &[CapabilityEntry]) -> Result<()> {
        let payload = serde_json::to_string(entries).context("Failed to serialize capability entries")?;
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| anyhow!("Expiry of {} after {} is out of range", self.ttl, now))?;
        self.store
            .set(&Self::cache_identifier(direction), payload, expires_at)
            .await
    }

    /// Codes that accept a `formality` parameter, across both directions
    pub async fn formality_supported(&self) -> BTreeSet<String> {
        let mut codes = BTreeSet::new();
        for direction in Direction::ALL {
            codes.extend(
                self.get_capabilities(direction)
                    .await
                    .into_iter()
                    .filter(|entry| entry.supports_formality)
                    .map(|entry| normalize_code(&entry.language)),
            );
        }
        codes
    }

    /// Normalized codes supported in a direction
    pub async fn supported_languages(&self, direction: Direction) -> BTreeSet<String> {
        self.get_capabilities(direction)
            .await
            .iter()
            .map(|entry| normalize_code(&entry.language))
            .collect()
    }

    /// Whether `code` is supported in a direction
    pub async fn supports(&self, direction: Direction, code: &str) -> bool {
        self.supported_languages(direction)
            .await
            .contains(&normalize_code(code))
    }

    /// Drop a direction's record so the next call refetches
    pub async fn invalidate(&self, direction: Direction) -> Result<bool> {
        let _guard = self.locks.lock(&direction).await;
        self.store.remove(&Self::cache_identifier(direction)).await
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
