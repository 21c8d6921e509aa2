use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering::SeqCst};

use crossbeam::utils::Backoff;

use crate::lock::ParticipantLock;

/// Dekker's algorithm for exactly two participants, `0` and `1`.
///
/// Each participant raises a `want` flag before entering; when both want in,
/// the holder of `turn` proceeds and the other backs off until the turn is
/// handed to it on release. Every flag and turn access is sequentially
/// consistent: the store to our own flag must be ordered before the load of the
/// other's, which acquire/release alone does not guarantee.
#[derive(Debug)]
pub struct DekkerLock {
    want: [AtomicBool; 2],
    turn: AtomicUsize,
}

impl DekkerLock {
    pub fn new() -> Self {
        Self {
            want: [AtomicBool::new(false), AtomicBool::new(false)],
            turn: AtomicUsize::new(0),
        }
    }
}

impl Default for DekkerLock {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticipantLock for DekkerLock {
    fn acquire(&self, id: usize) {
        assert!(id < 2, "Dekker lock cannot support participant {}", id);
        let other = 1 - id;

        let backoff = Backoff::new();
        self.want[id].store(true, SeqCst);
        while self.want[other].load(SeqCst) {
            if self.turn.load(SeqCst) != id {
                self.want[id].store(false, SeqCst);
                while self.turn.load(SeqCst) != id {
                    backoff.snooze();
                }
                self.want[id].store(true, SeqCst);
            } else {
                // our turn: the other side is about to back off
                backoff.snooze();
            }
        }
    }

    fn release(&self, id: usize) {
        self.turn.store(1 - id, SeqCst);
        self.want[id].store(false, SeqCst);
    }

    fn capacity(&self) -> Option<usize> {
        Some(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_hands_turn_to_other() {
        let lock = DekkerLock::new();
        lock.acquire(0);
        lock.release(0);
        assert_eq!(lock.turn.load(SeqCst), 1);
        assert!(!lock.want[0].load(SeqCst));

        lock.acquire(1);
        lock.release(1);
        assert_eq!(lock.turn.load(SeqCst), 0);
    }

    #[test]
    fn uncontended_acquire_ignores_turn() {
        // participant 1 does not hold the turn, but nobody else wants in
        let lock = DekkerLock::new();
        lock.acquire(1);
        lock.release(1);
        lock.acquire(1);
        lock.release(1);
    }

    #[test]
    #[should_panic(expected = "cannot support participant 2")]
    fn third_participant_is_rejected() {
        DekkerLock::new().acquire(2);
    }
}
