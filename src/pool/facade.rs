//! The pool façade: thread-safe dispatch of alloc/realloc/free/gc/counters
//! to a selected strategy, guarded end-to-end by the pool's spinlock.

use log::{debug, trace};

use crate::error::{pool_error, PoolError, PoolErrorCode};
use crate::pool::counters::PoolCounters;
use crate::pool::handle_table::HandleTable;
use crate::pool::options::PoolOptions;
use crate::pool::registry::{self, REGISTRY};
use crate::pool::strategy::Strategy;
use crate::ptrs::data_ptr::DataPtr;
use crate::spinlock::Spinlock;

struct PoolState {
    table: HandleTable,
    strategy: Strategy,
    last_error: Option<PoolError>,
}

/// A memory pool bound to a single allocation strategy, selected either by
/// capability bitset ([`Pool::with_options`]) or by name
/// ([`Pool::with_name`]).
///
/// Every public operation here acquires the pool's spinlock for its
/// duration: the critical section covers the strategy call and its
/// handle-table mutation.
pub struct Pool {
    state: Spinlock<PoolState>,
}

impl Pool {
    /// Selects the strategy whose registered capability bitset exactly
    /// equals `options`. Fails with [`PoolErrorCode::NotImplemented`] if no
    /// entry matches. Asking for a superset of a strategy's capabilities
    /// is not a fallback, it is a configuration error.
    pub fn with_options(options: PoolOptions) -> Result<Self, PoolError> {
        let entry = registry::find_by_options(options).ok_or_else(|| {
            pool_error!(
                PoolErrorCode::NotImplemented,
                "no strategy registered for options {:#x}",
                options.bits()
            )
        })?;
        let mut strategy = (entry.factory)();
        strategy.reset_counters();
        debug!("pool: created strategy '{}' from options", strategy.name());
        Ok(Self {
            state: Spinlock::new(PoolState {
                table: HandleTable::new(),
                strategy,
                last_error: None,
            }),
        })
    }

    /// Scans the registry invoking each factory in turn, keeping the first
    /// one whose name matches. Fails with [`PoolErrorCode::NotFound`] if no
    /// entry's name matches `name`.
    pub fn with_name(name: &str) -> Result<Self, PoolError> {
        for entry in REGISTRY {
            let mut candidate = (entry.factory)();
            if candidate.name() == name {
                candidate.reset_counters();
                debug!("pool: created strategy '{name}' by name");
                return Ok(Self {
                    state: Spinlock::new(PoolState {
                        table: HandleTable::new(),
                        strategy: candidate,
                        last_error: None,
                    }),
                });
            }
            // `candidate` is simply dropped here; see registry.rs for why
            // there is no separate per-entry destructor to invoke.
        }
        Err(pool_error!(
            PoolErrorCode::NotFound,
            "no memory pool found by name '{name}'"
        ))
    }

    /// The active strategy's registered name.
    pub fn impl_name(&self) -> &'static str {
        self.state.lock().strategy.name()
    }

    /// Drains and returns the most recently recorded error, if any.
    pub fn last_error(&self) -> Option<PoolError> {
        self.state.lock().last_error.clone()
    }

    fn record_error(state: &mut PoolState, err: PoolError) -> PoolError {
        state.last_error = Some(err.clone());
        err
    }

    /// Allocates `nbytes`. Fails with [`PoolErrorCode::IllegalArgument`] if
    /// `nbytes` is zero.
    pub fn alloc(&self, nbytes: u64) -> Result<DataPtr, PoolError> {
        if nbytes == 0 {
            return Err(pool_error!(PoolErrorCode::IllegalArgument, "alloc(0)"));
        }
        let mut state = self.state.lock();
        trace!("pool: alloc({nbytes})");
        state
            .strategy
            .alloc(&mut state.table, nbytes)
            .map_err(|e| Self::record_error(&mut state, e))
    }

    /// `alloc(how_many * nbytes)`. The multiplication is checked and
    /// overflow fails with [`PoolErrorCode::IllegalArgument`] instead of
    /// silently wrapping.
    pub fn alloc_array(&self, how_many: u32, nbytes: u64) -> Result<DataPtr, PoolError> {
        let total = (how_many as u64)
            .checked_mul(nbytes)
            .ok_or_else(|| pool_error!(PoolErrorCode::IllegalArgument, "alloc_array overflow"))?;
        self.alloc(total)
    }

    /// Reallocates `ptr` to `nbytes`. On success the returned pointer
    /// carries the same slot index as `ptr`. On failure `ptr` remains
    /// valid and usable.
    pub fn realloc(&self, ptr: DataPtr, nbytes: u64) -> Result<DataPtr, PoolError> {
        let mut state = self.state.lock();
        trace!("pool: realloc({nbytes})");
        state
            .strategy
            .realloc(&mut state.table, ptr, nbytes)
            .map_err(|e| Self::record_error(&mut state, e))
    }

    /// Frees `ptr`.
    pub fn free(&self, ptr: DataPtr) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        trace!("pool: free");
        state
            .strategy
            .free(&mut state.table, ptr)
            .map_err(|e| Self::record_error(&mut state, e))
    }

    /// Frees every live allocation in slot order. The handle table is
    /// empty when this returns successfully.
    pub fn free_all(&self) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        debug!("pool: free_all");
        let live = state.table.live_ptrs();
        for ptr in live {
            if let Err(e) = state.strategy.free(&mut state.table, ptr) {
                return Err(Self::record_error(&mut state, e));
            }
        }
        debug_assert!(state.table.is_empty());
        Ok(())
    }

    /// Refreshes and returns a snapshot of the strategy's counters.
    pub fn counters(&self) -> PoolCounters {
        let mut state = self.state.lock();
        state.strategy.refresh_counters();
        state.strategy.counters()
    }

    /// Zeroes the strategy's counters.
    pub fn reset_counters(&self) {
        let mut state = self.state.lock();
        state.strategy.reset_counters();
    }

    /// Runs the strategy's garbage collection hook.
    pub fn gc(&self) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        state
            .strategy
            .gc()
            .map_err(|e| Self::record_error(&mut state, e))
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        let _ = self.free_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::strategies::{magic::NAME as MAGIC_NAME, none::NAME as NONE_NAME};

    #[test]
    fn alloc_free_round_trip_updates_counters() {
        let pool = Pool::with_options(PoolOptions::UNPOOLED).unwrap();
        let p1 = pool.alloc(128).unwrap();
        assert!(!p1.get_address().is_null());
        assert_eq!(p1.get_payload().unwrap(), 0);

        pool.free(p1).unwrap();
        let counters = pool.counters();
        assert_eq!(counters.num_alloc_calls, 1);
        assert_eq!(counters.num_free_calls, 1);
        assert_eq!(counters.num_bytes_allocd, 128);
        assert_eq!(counters.num_bytes_freed, 128);
    }

    #[test]
    fn freed_slot_is_reused_before_a_new_one_is_appended() {
        let pool = Pool::with_options(PoolOptions::UNPOOLED).unwrap();
        let p1 = pool.alloc(8).unwrap();
        assert_eq!(p1.get_payload().unwrap(), 0);
        let p2 = pool.alloc(8).unwrap();
        assert_eq!(p2.get_payload().unwrap(), 1);

        pool.free(p1).unwrap();
        let p3 = pool.alloc(8).unwrap();
        assert_eq!(p3.get_payload().unwrap(), 0);

        pool.free(p2).unwrap();
        pool.free(p3).unwrap();
    }

    #[test]
    fn realloc_preserves_slot_and_bumps_counter() {
        let pool = Pool::with_options(PoolOptions::UNPOOLED).unwrap();
        let p1 = pool.alloc(16).unwrap();
        let slot = p1.get_payload().unwrap();

        let p1b = pool.realloc(p1, 64).unwrap();
        assert_eq!(p1b.get_payload().unwrap(), slot);
        assert_eq!(pool.counters().num_realloc_calls, 1);

        pool.free(p1b).unwrap();
    }

    #[test]
    fn with_name_selects_the_matching_strategy() {
        let pool = Pool::with_name(NONE_NAME).unwrap();
        assert_eq!(pool.impl_name(), NONE_NAME);

        let pool = Pool::with_name(MAGIC_NAME).unwrap();
        assert_eq!(pool.impl_name(), MAGIC_NAME);
    }

    #[test]
    fn with_name_fails_not_found_for_unknown_name() {
        let err = Pool::with_name("does-not-exist").unwrap_err();
        assert_eq!(err.code, PoolErrorCode::NotFound);
    }

    #[test]
    fn with_options_requires_exact_capability_match() {
        let err = Pool::with_options(PoolOptions::POOLED | PoolOptions::GC_SYNC).unwrap_err();
        assert_eq!(err.code, PoolErrorCode::NotImplemented);
    }

    #[test]
    fn alloc_zero_bytes_is_illegal_argument() {
        let pool = Pool::with_options(PoolOptions::UNPOOLED).unwrap();
        let err = pool.alloc(0).unwrap_err();
        assert_eq!(err.code, PoolErrorCode::IllegalArgument);
    }

    #[test]
    fn alloc_array_overflow_fails_instead_of_wrapping() {
        let pool = Pool::with_options(PoolOptions::UNPOOLED).unwrap();
        let err = pool.alloc_array(u32::MAX, u64::MAX).unwrap_err();
        assert_eq!(err.code, PoolErrorCode::IllegalArgument);
    }

    #[test]
    fn free_all_empties_the_table_and_accounts_every_byte() {
        let pool = Pool::with_options(PoolOptions::UNPOOLED).unwrap();
        for n in [8u64, 16, 32, 64] {
            pool.alloc(n).unwrap();
        }
        pool.free_all().unwrap();
        let counters = pool.counters();
        assert_eq!(counters.num_free_calls, 4);
        assert_eq!(counters.num_bytes_freed, counters.num_bytes_allocd);
    }

    #[test]
    fn last_error_reflects_the_most_recent_failure() {
        let pool = Pool::with_options(PoolOptions::UNPOOLED).unwrap();
        assert!(pool.last_error().is_none());
        let _ = pool.alloc(0);
        assert_eq!(
            pool.last_error().map(|e| e.code),
            Some(PoolErrorCode::IllegalArgument)
        );
    }
}
