//! Indirection over `std`/`loom` primitives so the spinlock and handle table
//! can be exercised under loom's concurrency model checker.
//!
//! Outside of `--cfg loom` builds this is just `core`/`std` re-exported;
//! `cfg(loom)` swaps in `loom`'s shadow types, which is the only way loom can
//! see the atomic operations it needs to explore interleavings of.

macro_rules! spread_attr {
    (
        #[$cfg:meta]
        $($i:item)*
    ) => {
        $(
            #[$cfg]
            $i
        )*
    };
}

spread_attr! {
#[cfg(not(loom))]

pub(crate) use core::sync::atomic::{AtomicBool, Ordering};
}

spread_attr! {
#[cfg(loom)]

pub(crate) use loom::sync::atomic::{AtomicBool, Ordering};
}
