//! The pool's directory of currently-live allocations.
//!
//! Turns a raw `(address, bytes)` allocation into a [`DataPtr`] that also
//! carries a back-index (the "slot") into this table, and recycles slots
//! LIFO on free, so `ptr -> info` is O(1) with no side-table lookup.

use crate::error::{pool_error, PoolError, PoolErrorCode};
use crate::ptrs::data_ptr::DataPtr;

/// Reserved to distinguish "no data"; the table can hold at most this many
/// live slots.
const SLOT_LIMIT: usize = u16::MAX as usize - 1;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PoolPtrInfo {
    pub(crate) is_free: bool,
    pub(crate) bytes_used: u32,
    pub(crate) bytes_total: u32,
    pub(crate) ptr: DataPtr,
}

#[derive(Default)]
pub(crate) struct HandleTable {
    in_use: Vec<PoolPtrInfo>,
    freelist: Vec<u16>,
}

impl HandleTable {
    pub(crate) fn new() -> Self {
        Self {
            in_use: Vec::with_capacity(100),
            freelist: Vec::with_capacity(100),
        }
    }

    /// Registers a fresh allocation and returns the data pointer carrying
    /// its slot index in the payload.
    pub(crate) fn register(
        &mut self,
        addr: *mut u8,
        bytes_used: u32,
        bytes_total: u32,
    ) -> Result<DataPtr, PoolError> {
        let pos: usize;
        if let Some(&reused) = self.freelist.last() {
            debug_assert!(self.in_use[reused as usize].is_free);
            pos = reused as usize;
            self.freelist.pop();
        } else {
            pos = self.in_use.len();
            if pos >= SLOT_LIMIT {
                return Err(pool_error!(
                    PoolErrorCode::PoolLimitReached,
                    "maximum number of pooled pointers reached"
                ));
            }
            self.in_use.push(PoolPtrInfo {
                is_free: true,
                bytes_used: 0,
                bytes_total: 0,
                ptr: DataPtr::NULL,
            });
        }

        let mut ptr = DataPtr::create(addr)?;
        ptr.set_payload(pos as u16)?;

        self.in_use[pos] = PoolPtrInfo {
            is_free: false,
            bytes_used,
            bytes_total,
            ptr,
        };

        debug_assert!(!self.in_use[pos].is_free);
        debug_assert_eq!(self.in_use[pos].ptr.get_address(), addr);

        Ok(ptr)
    }

    /// Releases the slot addressed by `ptr`'s payload back to the freelist.
    pub(crate) fn unregister(&mut self, ptr: DataPtr) -> Result<(), PoolError> {
        let info = self.get_mut(ptr)?;
        info.is_free = true;
        let pos = ptr.get_payload()?;
        self.freelist.push(pos);
        Ok(())
    }

    /// Looks up the info for a live `ptr`, asserting it is not free and
    /// that its stored address matches.
    pub(crate) fn get(&self, ptr: DataPtr) -> Result<&PoolPtrInfo, PoolError> {
        let pos = ptr.get_payload()? as usize;
        let info = self
            .in_use
            .get(pos)
            .ok_or_else(|| pool_error!(PoolErrorCode::OutOfBounds))?;
        if info.is_free {
            return Err(pool_error!(
                PoolErrorCode::OutOfBounds,
                "slot {pos} already free"
            ));
        }
        if info.ptr.get_address() != ptr.get_address() {
            return Err(pool_error!(
                PoolErrorCode::OutOfBounds,
                "stale data pointer for slot {pos}"
            ));
        }
        Ok(info)
    }

    pub(crate) fn get_mut(&mut self, ptr: DataPtr) -> Result<&mut PoolPtrInfo, PoolError> {
        let pos = ptr.get_payload()? as usize;
        let addr = ptr.get_address();
        let info = self
            .in_use
            .get_mut(pos)
            .ok_or_else(|| pool_error!(PoolErrorCode::OutOfBounds))?;
        if info.is_free {
            return Err(pool_error!(
                PoolErrorCode::OutOfBounds,
                "slot {pos} already free"
            ));
        }
        if info.ptr.get_address() != addr {
            return Err(pool_error!(
                PoolErrorCode::OutOfBounds,
                "stale data pointer for slot {pos}"
            ));
        }
        Ok(info)
    }

    /// Number of slots currently marked non-free.
    pub(crate) fn live_count(&self) -> usize {
        self.in_use.iter().filter(|i| !i.is_free).count()
    }

    /// All non-free entries' data pointers, in slot order. Used by
    /// `free_all` to iterate the table deterministically.
    pub(crate) fn live_ptrs(&self) -> Vec<DataPtr> {
        self.in_use
            .iter()
            .filter(|i| !i.is_free)
            .map(|i| i.ptr)
            .collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.live_count() == 0
    }
}
