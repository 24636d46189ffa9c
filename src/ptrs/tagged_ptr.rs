//! A tagged pointer packs a small tag into the low, unused alignment bits
//! of an address. This implementation uses a 2-bit mask, requiring
//! 4-byte-aligned addresses; callers are responsible for that alignment,
//! it is not checked here.

use core::fmt;

use crate::error::{pool_error, PoolError, PoolErrorCode};

const TAG_BITS: usize = 2;
const TAG_MASK: usize = (1 << TAG_BITS) - 1;
const ADDR_MASK: usize = !TAG_MASK;

/// A machine word carrying a 4-byte-aligned address and a 2-bit tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaggedPtr(usize);

impl TaggedPtr {
    /// The null/invalid sentinel: address and tag both zero.
    pub const NULL: TaggedPtr = TaggedPtr(0);

    /// Creates a tagged pointer for `addr` with tag zero.
    ///
    /// Fails with [`PoolErrorCode::NullPointer`] if `addr` is null. Does
    /// not check alignment, the caller must guarantee `addr` is at least
    /// 4-byte aligned.
    pub fn create(addr: *mut u8) -> Result<Self, PoolError> {
        if addr.is_null() {
            return Err(pool_error!(PoolErrorCode::NullPointer));
        }
        Ok(Self((addr as usize) & ADDR_MASK))
    }

    /// Returns a pointer whose address becomes `addr`, preserving the tag.
    pub fn update(self, addr: *mut u8) -> Result<Self, PoolError> {
        let tag = self.get_tag()?;
        let mut next = Self::create(addr)?;
        next.set_tag(tag)?;
        Ok(next)
    }

    /// Sets the tag (must be in `0..4`). Fails with
    /// [`PoolErrorCode::IllegalArgument`] if `tag` is out of range.
    pub fn set_tag(&mut self, tag: u8) -> Result<(), PoolError> {
        if tag as usize > TAG_MASK {
            return Err(pool_error!(
                PoolErrorCode::IllegalArgument,
                "tag {tag} exceeds 2-bit range"
            ));
        }
        self.0 = (self.0 & ADDR_MASK) | (tag as usize);
        Ok(())
    }

    /// Reads the tag. Fails if `self` is null.
    pub fn get_tag(self) -> Result<u8, PoolError> {
        if self == Self::NULL {
            return Err(pool_error!(PoolErrorCode::NullPointer));
        }
        Ok((self.0 & TAG_MASK) as u8)
    }

    /// True iff the tag is non-zero. Fails if `self` is null.
    pub fn is_tagged(self) -> Result<bool, PoolError> {
        Ok(self.get_tag()? != 0)
    }

    /// Extracts the address with the tag bits masked off. Fails if `self`
    /// is null, unlike [`DataPtr::get_address`](crate::ptrs::data_ptr::DataPtr::get_address)
    /// which is null-safe.
    pub fn get_address(self) -> Result<*mut u8, PoolError> {
        if self == Self::NULL {
            return Err(pool_error!(PoolErrorCode::NullPointer));
        }
        Ok((self.0 & ADDR_MASK) as *mut u8)
    }
}

impl fmt::Debug for TaggedPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedPtr")
            .field("address", &self.get_address().ok())
            .field("tag", &self.get_tag().unwrap_or(0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(a: usize) -> *mut u8 {
        a as *mut u8
    }

    #[test]
    fn address_and_tag_round_trip_for_aligned_addresses() {
        for a in [0x100usize, 0x1000, 0xdead_be00] {
            for t in 0u8..4 {
                let mut ptr = TaggedPtr::create(addr(a)).unwrap();
                ptr.set_tag(t).unwrap();
                assert_eq!(ptr.get_address().unwrap(), addr(a));
                assert_eq!(ptr.get_tag().unwrap(), t);
            }
        }
    }

    #[test]
    fn set_tag_rejects_out_of_range() {
        let mut ptr = TaggedPtr::create(addr(0x100)).unwrap();
        assert!(ptr.set_tag(4).is_err());
        assert!(ptr.set_tag(255).is_err());
    }

    #[test]
    fn update_preserves_tag() {
        let mut ptr = TaggedPtr::create(addr(0x100)).unwrap();
        ptr.set_tag(3).unwrap();
        let ptr = ptr.update(addr(0x200)).unwrap();
        assert_eq!(ptr.get_tag().unwrap(), 3);
        assert_eq!(ptr.get_address().unwrap(), addr(0x200));
    }

    #[test]
    fn is_tagged_reflects_nonzero_tag() {
        let mut ptr = TaggedPtr::create(addr(0x100)).unwrap();
        assert!(!ptr.is_tagged().unwrap());
        ptr.set_tag(1).unwrap();
        assert!(ptr.is_tagged().unwrap());
    }
}
