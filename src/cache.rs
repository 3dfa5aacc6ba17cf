//! In-memory cache for registry lookups
//!
//! Only successful lookups are stored. A failed lookup is retried on the
//! next scan.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::registries::{LookupError, Registry, VersionInfo};

/// Default TTL for cache entries (1 hour)
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// How often the background task drops expired entries
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry {
    data: VersionInfo,
    inserted_at: Instant,
}

/// In-memory cache using DashMap for thread-safety
#[derive(Clone)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    /// Create a new cache with default TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Get a value, ignoring expired entries
    pub fn get(&self, key: &str) -> Option<VersionInfo> {
        self.entries.get(key).and_then(|entry| {
            if entry.inserted_at.elapsed() >= self.ttl {
                None
            } else {
                Some(entry.data.clone())
            }
        })
    }

    pub fn insert(&self, key: String, value: VersionInfo) {
        self.entries.insert(
            key,
            CacheEntry {
                data: value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Spawn a background task that removes expired entries every `every`.
    /// The task ends once the last clone of this cache is dropped.
    pub fn spawn_cleanup_task(&self, every: Duration) -> JoinHandle<()> {
        let entries: Weak<DashMap<String, CacheEntry>> = Arc::downgrade(&self.entries);
        let ttl = self.ttl;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await; // Skip immediate first tick

            loop {
                interval.tick().await;
                let Some(entries) = entries.upgrade() else {
                    tracing::debug!("Cache dropped, stopping cleanup task");
                    break;
                };
                let removed = remove_expired(&entries, ttl);
                if removed > 0 {
                    tracing::info!("Background cleanup: removed {removed} expired entries");
                }
            }
        })
    }

    /// Number of entries, including expired ones not yet cleaned up
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns the number of entries removed.
fn remove_expired(entries: &DashMap<String, CacheEntry>, ttl: Duration) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
    let removed = before - entries.len();
    if removed > 0 {
        tracing::debug!(
            "Cleaned up {removed} expired cache entries ({} remaining)",
            entries.len()
        );
    }
    removed
}

/// Registry wrapper that answers from a [`MemoryCache`] before asking the
/// wrapped registry.
pub struct CachedRegistry<R> {
    inner: R,
    cache: MemoryCache,
}

impl<R: Registry> CachedRegistry<R> {
    pub fn new(inner: R, cache: MemoryCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &MemoryCache {
        &self.cache
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Registry> Registry for CachedRegistry<R> {
    async fn get_version_info(&self, package_name: &str) -> Result<VersionInfo, LookupError> {
        if let Some(cached) = self.cache.get(package_name) {
            tracing::debug!("Cache hit for {package_name}");
            return Ok(cached);
        }

        let info = self.inner.get_version_info(package_name).await?;
        self.cache.insert(package_name.to_string(), info.clone());
        Ok(info)
    }
}
