use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam::utils::Backoff;

use crate::lock::ParticipantLock;

/// Memory orderings used by a [`PetersonLock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetersonOrdering {
    /// Every access is `SeqCst`.
    SeqCst,
    /// Relaxed turn store, spin-condition loads and release store.
    ///
    /// Nothing orders our flag store before the load of the other flag, so on
    /// weakly-ordered hardware both participants can read the other's flag as
    /// lowered and enter together. Only for demonstrating that failure.
    Relaxed,
}

impl PetersonOrdering {
    /// Ordering for the turn store, the spin loads and the release store.
    /// The flag raise in `acquire` is always `SeqCst`.
    fn order(self) -> Ordering {
        match self {
            PetersonOrdering::SeqCst => Ordering::SeqCst,
            PetersonOrdering::Relaxed => Ordering::Relaxed,
        }
    }
}

/// Peterson's algorithm for exactly two participants, `0` and `1`.
#[derive(Debug)]
pub struct PetersonLock {
    flags: [AtomicBool; 2],
    turn: AtomicUsize,
    ordering: PetersonOrdering,
}

impl PetersonLock {
    pub fn new() -> Self {
        Self::with_ordering(PetersonOrdering::SeqCst)
    }

    /// The relaxed variant, see [`PetersonOrdering::Relaxed`].
    pub fn relaxed() -> Self {
        Self::with_ordering(PetersonOrdering::Relaxed)
    }

    pub fn with_ordering(ordering: PetersonOrdering) -> Self {
        Self {
            flags: [AtomicBool::new(false), AtomicBool::new(false)],
            turn: AtomicUsize::new(0),
            ordering,
        }
    }

    pub fn ordering(&self) -> PetersonOrdering {
        self.ordering
    }

    pub fn is_relaxed(&self) -> bool {
        self.ordering == PetersonOrdering::Relaxed
    }
}

impl Default for PetersonLock {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticipantLock for PetersonLock {
    fn acquire(&self, id: usize) {
        assert!(id < 2, "Peterson lock cannot support participant {}", id);
        let other = 1 - id;
        let order = self.ordering.order();

        self.flags[id].store(true, Ordering::SeqCst);
        // give way: the last participant to write the turn waits
        self.turn.store(other, order);

        let backoff = Backoff::new();
        while self.flags[other].load(order) && self.turn.load(order) != id {
            backoff.snooze();
        }
    }

    fn release(&self, id: usize) {
        self.flags[id].store(false, self.ordering.order());
    }

    fn capacity(&self) -> Option<usize> {
        Some(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_yields_turn_to_other() {
        let lock = PetersonLock::new();
        lock.acquire(0);
        assert_eq!(lock.turn.load(Ordering::SeqCst), 1);
        assert!(lock.flags[0].load(Ordering::SeqCst));
        lock.release(0);
        assert!(!lock.flags[0].load(Ordering::SeqCst));
    }

    #[test]
    fn constructors_pick_ordering() {
        assert_eq!(PetersonLock::new().ordering(), PetersonOrdering::SeqCst);
        assert!(PetersonLock::relaxed().is_relaxed());
        assert_eq!(PetersonLock::default().capacity(), Some(2));
    }

    #[test]
    #[should_panic(expected = "cannot support participant 3")]
    fn third_participant_is_rejected() {
        PetersonLock::new().acquire(3);
    }
}
