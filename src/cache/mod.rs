//! Bucketed LRU string cache: caches `id -> string` bindings produced by
//! an external [`StringResolver`] to amortize string materialization cost.
//!
//! Not internally synchronized. Callers must confine a given cache to one
//! thread or wrap it externally. Only the pool's handle table is shared
//! across threads, guarded by the spinlock instead.

mod bucket;
mod hash;
pub mod resolver;

use log::trace;

use bucket::BucketList;
pub use resolver::{ArchiveInfo, StringResolver};

/// Hit/miss/eviction counters, resettable independently of the cache's
/// contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups satisfied from cache.
    pub num_hits: u64,
    /// Number of lookups that had to call the resolver.
    pub num_misses: u64,
    /// Number of entries displaced to make room for a miss's result.
    pub num_evicted: u64,
}

/// A bounded, bucketed LRU cache over `id -> String`.
pub struct StringCache<R> {
    buckets: Vec<BucketList>,
    stats: CacheStats,
    resolver: R,
    capacity: usize,
}

impl<R: StringResolver> StringCache<R> {
    /// Derives `capacity = floor(0.25 * archive.num_embedded_strings())`
    /// and builds a cache of that size (at least 1 bucket).
    pub fn with_archive(resolver: R, archive: &impl ArchiveInfo) -> Self {
        let capacity = (archive.num_embedded_strings() as f64 * 0.25) as usize;
        Self::with_capacity(resolver, capacity)
    }

    /// Builds a cache with an explicit bucket count (at least 1).
    pub fn with_capacity(resolver: R, capacity: usize) -> Self {
        let num_buckets = capacity.max(1);
        Self {
            buckets: (0..num_buckets).map(|_| BucketList::new()).collect(),
            stats: CacheStats::default(),
            resolver,
            capacity: num_buckets,
        }
    }

    /// The number of buckets backing this cache.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn bucket_index(&self, id: u64) -> usize {
        let h = hash::bernstein32(&id.to_ne_bytes());
        (h as usize) % self.buckets.len()
    }

    /// Looks up `id`, materializing it via the resolver on a miss and
    /// evicting the bucket's least-recently-used entry if it was occupied.
    /// Always returns an owned copy of the cached string.
    pub fn get(&mut self, id: u64) -> String {
        let idx = self.bucket_index(id);
        let bucket = &mut self.buckets[idx];

        if let Some(hit) = bucket.find(id) {
            bucket.make_most_recent(hit);
            self.stats.num_hits += 1;
            trace!("string cache: hit id={id}");
            return bucket.string_at(hit).to_string();
        }

        let resolved = self.resolver.resolve(id);
        if bucket.least_recent_is_occupied() {
            self.stats.num_evicted += 1;
        }
        let inserted = bucket.insert_at_least_recent(id, resolved);
        self.stats.num_misses += 1;
        trace!("string cache: miss id={id}");
        bucket.string_at(inserted).to_string()
    }

    /// A snapshot of this cache's hit/miss/eviction counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Zeroes the hit/miss/eviction counters without touching cache contents.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingResolver {
        calls: Cell<u32>,
    }

    impl StringResolver for CountingResolver {
        fn resolve(&self, id: u64) -> String {
            self.calls.set(self.calls.get() + 1);
            format!("string-{id}")
        }
    }

    #[test]
    fn hit_then_hit_again_does_not_call_resolver_twice() {
        let mut cache = StringCache::with_capacity(CountingResolver { calls: Cell::new(0) }, 1);

        let first = cache.get(7);
        assert_eq!(first, "string-7");
        assert_eq!(cache.stats(), CacheStats { num_hits: 0, num_misses: 1, num_evicted: 0 });

        let calls_before = cache.resolver.calls.get();
        let second = cache.get(7);
        assert_eq!(second, "string-7");
        assert_eq!(cache.resolver.calls.get(), calls_before, "resolver must not be called on a hit");
        assert_eq!(cache.stats(), CacheStats { num_hits: 1, num_misses: 1, num_evicted: 0 });
    }

    #[test]
    fn fills_bucket_then_evicts_on_next_distinct_id() {
        let mut cache = StringCache::with_capacity(CountingResolver { calls: Cell::new(0) }, 1);
        for i in 0..1024u64 {
            cache.get(i);
        }
        assert_eq!(cache.stats().num_evicted, 0);
        cache.get(1024);
        assert_eq!(cache.stats().num_evicted, 1);
    }

    #[test]
    fn hit_makes_entry_most_recent() {
        let mut cache = StringCache::with_capacity(CountingResolver { calls: Cell::new(0) }, 1);
        cache.get(1);
        cache.get(2);
        // 1 is now least-recent-ish; touch it so it becomes most recent,
        // then fill the rest of the bucket and confirm 1 survives longer
        // than an untouched peer inserted at the same time.
        cache.get(1);
        for i in 3..1024u64 {
            cache.get(i);
        }
        // bucket is now full (1023 distinct ids: 1,2,3..1023); id 2 should
        // be the least-recently-used entry since only 1 was re-touched.
        cache.get(1024);
        assert_eq!(cache.stats().num_evicted, 1);
        // id 1 must still be resolvable as a hit (not the evicted one).
        let calls_before = cache.resolver.calls.get();
        cache.get(1);
        assert_eq!(cache.resolver.calls.get(), calls_before);
    }

    #[test]
    fn reset_stats_zeroes_counters() {
        let mut cache = StringCache::with_capacity(CountingResolver { calls: Cell::new(0) }, 1);
        cache.get(1);
        cache.get(1);
        cache.reset_stats();
        assert_eq!(cache.stats(), CacheStats::default());
    }

    struct FixedArchive(u32);
    impl ArchiveInfo for FixedArchive {
        fn num_embedded_strings(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn with_archive_derives_quarter_capacity() {
        let cache = StringCache::with_archive(CountingResolver { calls: Cell::new(0) }, &FixedArchive(40));
        assert_eq!(cache.capacity(), 10);
    }

    #[test]
    fn with_archive_never_derives_zero_buckets() {
        let cache = StringCache::with_archive(CountingResolver { calls: Cell::new(0) }, &FixedArchive(1));
        assert_eq!(cache.capacity(), 1);
    }
}
