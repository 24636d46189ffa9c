//! Polymorphic dispatch to an allocation strategy.
//!
//! A closed sum type dispatched with `match`: the compiler already refuses
//! to call `Magic`-only code on a `None` strategy, so there is no runtime
//! tag check to carry, unlike a vtable-based dispatch would need.

use crate::pool::counters::PoolCounters;
use crate::pool::handle_table::HandleTable;
use crate::pool::strategies::{magic::MagicStrategy, none::NoneStrategy};
use crate::error::PoolError;
use crate::ptrs::data_ptr::DataPtr;

pub(crate) enum Strategy {
    None(NoneStrategy),
    Magic(MagicStrategy),
}

impl Strategy {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Strategy::None(s) => s.name(),
            Strategy::Magic(s) => s.name(),
        }
    }

    pub(crate) fn alloc(
        &mut self,
        table: &mut HandleTable,
        nbytes: u64,
    ) -> Result<DataPtr, PoolError> {
        match self {
            Strategy::None(s) => s.alloc(table, nbytes),
            Strategy::Magic(s) => s.alloc(table, nbytes),
        }
    }

    pub(crate) fn realloc(
        &mut self,
        table: &mut HandleTable,
        ptr: DataPtr,
        nbytes: u64,
    ) -> Result<DataPtr, PoolError> {
        match self {
            Strategy::None(s) => s.realloc(table, ptr, nbytes),
            Strategy::Magic(s) => s.realloc(table, ptr, nbytes),
        }
    }

    pub(crate) fn free(&mut self, table: &mut HandleTable, ptr: DataPtr) -> Result<(), PoolError> {
        match self {
            Strategy::None(s) => s.free(table, ptr),
            Strategy::Magic(s) => s.free(table, ptr),
        }
    }

    pub(crate) fn gc(&mut self) -> Result<(), PoolError> {
        match self {
            Strategy::None(s) => s.gc(),
            Strategy::Magic(s) => s.gc(),
        }
    }

    pub(crate) fn refresh_counters(&mut self) {
        match self {
            Strategy::None(s) => s.refresh_counters(),
            Strategy::Magic(s) => s.refresh_counters(),
        }
    }

    pub(crate) fn reset_counters(&mut self) {
        match self {
            Strategy::None(s) => s.reset_counters(),
            Strategy::Magic(s) => s.reset_counters(),
        }
    }

    pub(crate) fn counters(&self) -> PoolCounters {
        match self {
            Strategy::None(s) => s.counters,
            Strategy::Magic(s) => s.counters,
        }
    }
}
