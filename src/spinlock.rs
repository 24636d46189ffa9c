//! The pool's mutual-exclusion primitive.
//!
//! A test-and-test-and-set busy-wait lock, not a blocking mutex. The
//! façade's critical sections are short, a strategy call plus a
//! handle-table mutation, and a spinlock keeps their floor cost lower than
//! parking a thread. A strategy that grows to do something long (a
//! freelist walk, say) can swap this for a blocking mutex without touching
//! callers.
//!
//! Not a general-purpose lock type, only guards the pool's own state.

use crate::loom::{AtomicBool, Ordering};
use core::cell::UnsafeCell;

pub(crate) struct Spinlock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send> Sync for Spinlock<T> {}

pub(crate) struct SpinlockGuard<'a, T> {
    lock: &'a Spinlock<T>,
}

impl<T> Spinlock<T> {
    // loom's AtomicBool::new isn't const, so this can't be const under
    // --cfg loom.
    #[cfg(not(loom))]
    pub(crate) const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    #[cfg(loom)]
    pub(crate) fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    pub(crate) fn lock(&self) -> SpinlockGuard<'_, T> {
        loop {
            // test first without the exchange's RMW traffic, then attempt
            // to actually acquire.
            if !self.locked.load(Ordering::Relaxed)
                && self
                    .locked
                    .compare_exchange_weak(
                        false,
                        true,
                        Ordering::Acquire,
                        Ordering::Relaxed,
                    )
                    .is_ok()
            {
                return SpinlockGuard { lock: self };
            }
            core::hint::spin_loop();
        }
    }
}

impl<T> core::ops::Deref for SpinlockGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> core::ops::DerefMut for SpinlockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinlockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::Spinlock;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn mutual_exclusion() {
        let lock = Arc::new(Spinlock::new(0usize));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let lock = lock.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    *lock.lock() += 1;
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*lock.lock(), 8000);
    }

    #[test]
    fn guard_derefs_to_inner_value() {
        let lock = Spinlock::new(String::from("hi"));
        assert_eq!(&*lock.lock(), "hi");
    }
}
