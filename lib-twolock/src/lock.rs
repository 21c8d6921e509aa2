use std::fmt::{self, Display};

use enum_dispatch::enum_dispatch;

use crate::{dekker::DekkerLock, mutex_lock::MutexLock, peterson::PetersonLock, spin_lock::SpinLock};

/// A mutual-exclusion lock whose callers identify themselves.
///
/// Participants are numbered `0..N` when they are spawned. A participant calls
/// `acquire` with its own index, runs its critical section, then calls
/// `release` with the same index. Between the two calls no other participant's
/// `acquire` returns.
#[enum_dispatch]
pub trait ParticipantLock: Send + Sync {
    /// Blocking: wait until participant `id` may enter the critical section.
    fn acquire(&self, id: usize);

    /// Leave the critical section entered by the matching `acquire(id)`.
    ///
    /// Must only be called by participant `id` while it holds the lock.
    fn release(&self, id: usize);

    /// Maximum number of participants, or `None` if the lock has no bound.
    fn capacity(&self) -> Option<usize> {
        None
    }
}

#[enum_dispatch(ParticipantLock)]
#[derive(Debug)]
pub enum LockType {
    Mutex(MutexLock),
    SpinLock(SpinLock),
    Peterson(PetersonLock),
    Dekker(DekkerLock),
}

impl Display for LockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockType::Mutex(_) => write!(f, "Mutex"),
            LockType::SpinLock(_) => write!(f, "SpinLock"),
            LockType::Peterson(lock) if lock.is_relaxed() => write!(f, "Peterson (relaxed)"),
            LockType::Peterson(_) => write!(f, "Peterson"),
            LockType::Dekker(_) => write!(f, "Dekker"),
        }
    }
}
