//! The pass-through strategy: delegates straight to the system allocator
//! and maintains counters. Registered in [`crate::pool::registry`] with an
//! all-zero capability bitset (`PoolOptions::UNPOOLED`).

use log::trace;

use super::common::{sys_alloc, sys_free, sys_realloc};
use crate::error::PoolError;
use crate::pool::counters::PoolCounters;
use crate::pool::handle_table::HandleTable;
use crate::ptrs::data_ptr::DataPtr;

/// The name this strategy registers under.
pub const NAME: &str = "mempool/none";

#[derive(Default)]
pub(crate) struct NoneStrategy {
    pub(crate) counters: PoolCounters,
}

impl NoneStrategy {
    pub(crate) fn name(&self) -> &'static str {
        NAME
    }

    pub(crate) fn alloc(
        &mut self,
        table: &mut HandleTable,
        nbytes: u64,
    ) -> Result<DataPtr, PoolError> {
        trace!("none: alloc {nbytes} bytes");
        sys_alloc(table, &mut self.counters, nbytes)
    }

    pub(crate) fn realloc(
        &mut self,
        table: &mut HandleTable,
        ptr: DataPtr,
        nbytes: u64,
    ) -> Result<DataPtr, PoolError> {
        trace!("none: realloc to {nbytes} bytes");
        sys_realloc(table, &mut self.counters, ptr, nbytes)
    }

    pub(crate) fn free(&mut self, table: &mut HandleTable, ptr: DataPtr) -> Result<(), PoolError> {
        trace!("none: free");
        sys_free(table, &mut self.counters, ptr)
    }

    pub(crate) fn gc(&mut self) -> Result<(), PoolError> {
        // Nothing to collect: this strategy keeps no freelist of its own.
        self.counters.num_gc_calls += 1;
        Ok(())
    }

    pub(crate) fn refresh_counters(&mut self) {
        self.counters.impl_mem_footprint = 0;
    }

    pub(crate) fn reset_counters(&mut self) {
        self.counters.reset();
    }
}
