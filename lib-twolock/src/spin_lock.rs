use crate::{
    lock::ParticipantLock,
    sync::{yield_now, AtomicBool, Ordering},
};

/// Test-and-set spin lock.
///
/// Any number of participants may contend; the participant index is ignored.
#[derive(Debug)]
pub struct SpinLock {
    flag: AtomicBool,
}

impl SpinLock {
    pub fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Non-blocking: a single test-and-set. Returns true if the lock was taken.
    #[inline]
    pub fn try_lock(&self) -> bool {
        !self.flag.swap(true, Ordering::Acquire)
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticipantLock for SpinLock {
    #[inline]
    fn acquire(&self, _id: usize) {
        while !self.try_lock() {
            yield_now();
        }
    }

    #[inline]
    fn release(&self, _id: usize) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn try_lock_fails_while_held() {
        let lock = SpinLock::new();
        assert!(lock.try_lock());
        assert!(!lock.try_lock());
        lock.release(0);
        assert!(lock.try_lock());
    }

    #[test]
    fn uncontended_acquire_returns() {
        let lock = SpinLock::default();
        for id in 0..4 {
            lock.acquire(id);
            lock.release(id);
        }
    }
}
