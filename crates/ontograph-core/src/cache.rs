//! # Viewport Cache
//!
//! Result cache for viewport queries.
//!
//! - Keyed by value: `(center, radius, limit, store_version)`; two distinct
//!   parameter tuples never alias
//! - Any store mutation bumps the version, so entries keyed by an old
//!   version become unreachable without explicit eviction
//! - A fixed TTL plus an on-access sweep bounds how long unreachable
//!   entries occupy memory
//!
//! This is the only shared mutable state the engine owns. Access is
//! read-heavy with infrequent writes on cache miss, so a single mutex
//! around a plain map is sufficient; a poisoned lock degrades to a cache
//! miss rather than a panic.

use crate::primitives::VIEWPORT_CACHE_TTL_SECS;
use crate::viewport::Viewport;
use crate::NodeId;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

// =============================================================================
// CACHE KEY & ENTRY
// =============================================================================

/// Full value key of a cached viewport.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ViewportKey {
    center: NodeId,
    radius: usize,
    limit: usize,
    version: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    viewport: Viewport,
    inserted_at: Instant,
}

// =============================================================================
// CACHE
// =============================================================================

/// TTL-bounded viewport result cache.
#[derive(Debug)]
pub struct ViewportCache {
    entries: Mutex<BTreeMap<ViewportKey, CacheEntry>>,
    ttl: Duration,
}

impl Default for ViewportCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportCache {
    /// Create a cache with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(VIEWPORT_CACHE_TTL_SECS))
    }

    /// Create a cache with an explicit TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ViewportKey, CacheEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            // A writer panicked mid-insert; the map itself is still a valid
            // cache, at worst holding an entry we are about to sweep.
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Look up a cached viewport for the exact parameter tuple and store
    /// version. Expired entries are swept on access.
    #[must_use]
    pub fn get(
        &self,
        center: &NodeId,
        radius: usize,
        limit: usize,
        version: u64,
    ) -> Option<Viewport> {
        let key = ViewportKey {
            center: center.clone(),
            radius,
            limit,
            version,
        };

        let mut entries = self.lock();
        let now = Instant::now();
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
        entries.get(&key).map(|entry| entry.viewport.clone())
    }

    /// Insert a freshly computed viewport.
    pub fn insert(
        &self,
        center: &NodeId,
        radius: usize,
        limit: usize,
        version: u64,
        viewport: Viewport,
    ) {
        let key = ViewportKey {
            center: center.clone(),
            radius,
            limit,
            version,
        };

        let mut entries = self.lock();
        entries.insert(
            key,
            CacheEntry {
                viewport,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of live entries (expired entries may still be counted until
    /// the next access sweeps them).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
