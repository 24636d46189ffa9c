//! Fixed-shape instrumentation block every strategy mutates under the
//! pool's lock.

/// Monotonic counters and totals tracked per pool. `reset` zeroes the
/// whole block; `impl_mem_footprint` is the one field a strategy's
/// `refresh` hook recomputes from its own state rather than accumulating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolCounters {
    /// Number of `alloc` calls made directly against the pool.
    pub num_alloc_calls: u32,
    /// Number of `realloc` calls made directly against the pool.
    pub num_realloc_calls: u32,
    /// Number of `free` calls made directly against the pool.
    pub num_free_calls: u32,

    /// Number of `gc` calls made against the pool.
    pub num_gc_calls: u32,

    /// Number of `alloc` calls made by the pool on its own behalf (e.g. to
    /// grow a backing region).
    pub num_managed_alloc_calls: u32,
    /// Number of `realloc` calls made by the pool on its own behalf.
    pub num_managed_realloc_calls: u32,
    /// Number of `free` calls made by the pool on its own behalf.
    pub num_managed_free_calls: u32,

    /// The strategy's own memory footprint, recomputed on `refresh`.
    pub impl_mem_footprint: u32,

    /// Total bytes handed out across all `alloc` calls.
    pub num_bytes_allocd: u32,
    /// Total bytes moved across all `realloc` calls.
    pub num_bytes_reallocd: u32,
    /// Total bytes released across all `free` calls.
    pub num_bytes_freed: u32,

    /// Bytes served from a cache on `alloc` rather than the system allocator.
    pub num_bytes_alloc_cache: u32,
    /// Bytes served from a cache on `realloc` rather than the system allocator.
    pub num_bytes_realloc_cache: u32,
    /// Bytes retained in a cache on `free` rather than released.
    pub num_bytes_free_cache: u32,

    /// Bytes an `alloc` request was blocked from claiming.
    pub num_bytes_alloc_blocked: u32,
    /// Bytes a `realloc` request was blocked from claiming.
    pub num_bytes_realloc_blocked: u32,
    /// Bytes a `free` request was blocked from releasing.
    pub num_bytes_free_blocked: u32,
}

impl PoolCounters {
    pub(crate) fn reset(&mut self) {
        *self = PoolCounters::default();
    }
}
