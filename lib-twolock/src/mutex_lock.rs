use std::fmt::{self, Debug};

use lock_api::RawMutex as _;
use parking_lot::RawMutex;

use crate::lock::ParticipantLock;

/// Blocking lock: acquire and release go straight to the native raw mutex.
///
/// A waiter is parked by the OS until the holder releases; the participant
/// index is ignored.
pub struct MutexLock {
    raw: RawMutex,
}

impl MutexLock {
    pub fn new() -> Self {
        Self { raw: RawMutex::INIT }
    }

    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }
}

impl Default for MutexLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for MutexLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutexLock")
            .field("locked", &self.is_locked())
            .finish()
    }
}

impl ParticipantLock for MutexLock {
    #[inline]
    fn acquire(&self, _id: usize) {
        self.raw.lock();
    }

    #[inline]
    fn release(&self, _id: usize) {
        // SAFETY: `release` is only called by the participant whose matching
        // `acquire` returned, so the mutex is held in this context.
        unsafe { self.raw.unlock() }
    }
}
