//! # Burrow Record Cache
//!
//! A monotonic record cache keyed by (name, type). Records accumulate while
//! the process runs; nothing is evicted and TTLs never count down. A record
//! that duplicates a cached one (same owner, type and payload) refreshes the
//! stored TTL instead of growing the entry.
//!
//! Lookups and inserts are lock-free reads/sharded writes over a
//! [`DashMap`], so the resolver never holds a cache lock across an await.

#![warn(missing_docs)]
#![warn(clippy::all)]

use burrow_proto::{Name, ResourceRecord, Type};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod key;

pub use key::CacheKey;

/// Hit/miss counters, updated on every lookup.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    /// Returns the number of lookups that found at least one record.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns the number of lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Returns the fraction of lookups that hit, or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

/// The record cache.
#[derive(Debug, Default)]
pub struct RecordCache {
    entries: DashMap<CacheKey, Vec<ResourceRecord>>,
    stats: CacheStats,
}

impl RecordCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its (owner name, type) key.
    ///
    /// A record carrying the same owner, type and payload as a cached one
    /// replaces it when the TTL differs (latest response wins) and is a
    /// no-op otherwise.
    pub fn insert(&self, record: ResourceRecord) {
        let key = CacheKey::new(record.name(), record.rtype());
        let mut entry = self.entries.entry(key).or_default();

        match entry.iter_mut().find(|cached| cached.same_data(&record)) {
            Some(cached) => {
                if cached.ttl() != record.ttl() {
                    *cached = record;
                }
            }
            None => entry.push(record),
        }
    }

    /// Returns every cached record for a key. Counts as a hit when the
    /// result is non-empty.
    pub fn lookup(&self, key: &CacheKey) -> Vec<ResourceRecord> {
        let records = self
            .entries
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        if records.is_empty() {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
        }

        records
    }

    /// Looks up records by name and type.
    pub fn lookup_records(&self, name: &Name, rtype: Type) -> Vec<ResourceRecord> {
        self.lookup(&CacheKey::new(name, rtype))
    }

    /// Returns true if the key has at least one cached record, without
    /// touching the hit/miss counters.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_empty())
            .unwrap_or(false)
    }

    /// Visits every (key, records) entry. Iteration order is unspecified.
    pub fn for_each(&self, mut visit: impl FnMut(&CacheKey, &[ResourceRecord])) {
        for entry in self.entries.iter() {
            visit(entry.key(), entry.value());
        }
    }

    /// Returns the number of distinct (name, type) keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the hit/miss counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
