//! A second strategy sharing the exact same interface and observable
//! behavior as [`super::none`]. It exists to exercise the registry's
//! multi-strategy registration and name-lookup path, and to leave room for
//! genuinely distinct strategies (freelist, arena) to be added later
//! without the façade or handle table changing. Registered with
//! `PoolOptions::POOLED` set and nothing else.

use log::trace;

use super::common::{sys_alloc, sys_free, sys_realloc};
use crate::error::PoolError;
use crate::pool::counters::PoolCounters;
use crate::pool::handle_table::HandleTable;
use crate::ptrs::data_ptr::DataPtr;

/// The name this strategy registers under.
pub const NAME: &str = "mempool/magic";

#[derive(Default)]
pub(crate) struct MagicStrategy {
    pub(crate) counters: PoolCounters,
}

impl MagicStrategy {
    pub(crate) fn name(&self) -> &'static str {
        NAME
    }

    pub(crate) fn alloc(
        &mut self,
        table: &mut HandleTable,
        nbytes: u64,
    ) -> Result<DataPtr, PoolError> {
        trace!("magic: alloc {nbytes} bytes");
        sys_alloc(table, &mut self.counters, nbytes)
    }

    pub(crate) fn realloc(
        &mut self,
        table: &mut HandleTable,
        ptr: DataPtr,
        nbytes: u64,
    ) -> Result<DataPtr, PoolError> {
        trace!("magic: realloc to {nbytes} bytes");
        sys_realloc(table, &mut self.counters, ptr, nbytes)
    }

    pub(crate) fn free(&mut self, table: &mut HandleTable, ptr: DataPtr) -> Result<(), PoolError> {
        trace!("magic: free");
        sys_free(table, &mut self.counters, ptr)
    }

    pub(crate) fn gc(&mut self) -> Result<(), PoolError> {
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
