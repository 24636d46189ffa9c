//! Shared system-allocator plumbing for the `none` and `magic` strategies.
//!
//! Both strategies just wrap the system allocator and differ only in their
//! registered name, so both share this logic rather than duplicating it.

use std::alloc::{self, Layout};

use crate::error::{pool_error, PoolError, PoolErrorCode};
use crate::pool::counters::PoolCounters;
use crate::pool::handle_table::HandleTable;
use crate::ptrs::data_ptr::DataPtr;

/// Matches the alignment guarantee of a typical platform `malloc` (16
/// bytes is sufficient for every type used through this byte-oriented
/// pool on 64-bit targets).
const ALLOC_ALIGN: usize = 16;

fn layout_for(nbytes: u64) -> Layout {
    Layout::from_size_align(nbytes as usize, ALLOC_ALIGN).expect("pool allocation size overflow")
}

/// Calls the system allocator for `nbytes` bytes. Aborts the process if
/// the allocator returns null. A caller that lost its pointer on a fresh
/// `alloc` has nothing to recover with.
pub(super) fn sys_alloc(
    table: &mut HandleTable,
    counters: &mut PoolCounters,
    nbytes: u64,
) -> Result<DataPtr, PoolError> {
    let layout = layout_for(nbytes);
    let raw = unsafe { alloc::alloc(layout) };
    if raw.is_null() {
        alloc::handle_alloc_error(layout);
    }

    counters.num_alloc_calls += 1;
    counters.num_bytes_allocd += nbytes as u32;

    table.register(raw, nbytes as u32, nbytes as u32)
}

/// Calls the system reallocator. Unlike `sys_alloc`, a failure here
/// *reports* rather than aborting, since the old pointer is still valid
/// and usable.
pub(super) fn sys_realloc(
    table: &mut HandleTable,
    counters: &mut PoolCounters,
    ptr: DataPtr,
    nbytes: u64,
) -> Result<DataPtr, PoolError> {
    let info = table.get(ptr)?;
    let old_layout = Layout::from_size_align(info.bytes_total as usize, ALLOC_ALIGN)
        .expect("stored allocation size overflow");
    let old_addr = ptr.get_address();

    counters.num_bytes_reallocd = nbytes as u32;
    counters.num_bytes_allocd += (info.bytes_total as i64 - nbytes as i64).unsigned_abs() as u32;

    let new_addr = unsafe { alloc::realloc(old_addr, old_layout, nbytes as usize) };
    if new_addr.is_null() {
        return Err(pool_error!(PoolErrorCode::ReallocFailed));
    }

    let updated = ptr.update(new_addr)?;
    let info = table.get_mut(updated)?;
    info.bytes_used = nbytes as u32;
    info.bytes_total = nbytes as u32;
    info.ptr = updated;
    counters.num_realloc_calls += 1;

    Ok(updated)
}

/// Releases the raw memory behind `ptr` and unregisters it from the
/// handle table.
pub(super) fn sys_free(
    table: &mut HandleTable,
    counters: &mut PoolCounters,
    ptr: DataPtr,
) -> Result<(), PoolError> {
    let info = *table.get(ptr)?;
    let layout = Layout::from_size_align(info.bytes_total as usize, ALLOC_ALIGN)
        .expect("stored allocation size overflow");

    unsafe { alloc::dealloc(info.ptr.get_address(), layout) };
    table.unregister(ptr)?;

    counters.num_free_calls += 1;
    counters.num_bytes_freed += info.bytes_total;

    Ok(())
}
