use clap::ValueEnum;
use libtwolock::{
    dekker::DekkerLock, mutex_lock::MutexLock, peterson::PetersonLock, spin_lock::SpinLock,
    LockType,
};
use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(Debug, ValueEnum, EnumIter, Clone, Copy, PartialEq, Eq, Display)]
pub enum LockTarget {
    /// Benchmark the blocking OS mutex
    Mutex,
    /// Benchmark the test-and-set spin lock
    SpinLock,
    /// Benchmark Peterson's lock
    Peterson,
    /// Benchmark Dekker's lock
    Dekker,
    /// Peterson's lock with relaxed spin loads; may break mutual exclusion
    PetersonRelaxed,
}

impl LockTarget {
    /// Whether the algorithm guarantees mutual exclusion on every target.
    pub fn is_sound(&self) -> bool {
        match self {
            LockTarget::Mutex | LockTarget::SpinLock | LockTarget::Peterson | LockTarget::Dekker => {
                true
            }
            LockTarget::PetersonRelaxed => false,
        }
    }

    /// Sound locks in report order: OS lock, spin lock, Peterson, Dekker.
    pub fn default_targets() -> Vec<LockTarget> {
        LockTarget::iter().filter(LockTarget::is_sound).collect()
    }

    pub fn to_locktype(&self) -> LockType {
        match self {
            LockTarget::Mutex => MutexLock::new().into(),
            LockTarget::SpinLock => SpinLock::new().into(),
            LockTarget::Peterson => PetersonLock::new().into(),
            LockTarget::Dekker => DekkerLock::new().into(),
            LockTarget::PetersonRelaxed => PetersonLock::relaxed().into(),
        }
    }
}
