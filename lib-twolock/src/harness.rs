//! Correctness checks run inside every critical section.
//!
//! Each entry walks OUTSIDE -> ENTERING -> INSIDE -> EXITING -> OUTSIDE. Inside,
//! the shared counter is checked to be 0, incremented, checked to be 1,
//! decremented and checked to be 0 again. Two participants inside at once make
//! one of the checks fail whichever half of the section they overlap in.

use std::{
    error::Error,
    fmt::{self, Display},
    sync::atomic::{AtomicBool, AtomicI64, Ordering::*},
};

use crate::lock::ParticipantLock;

/// Counter touched only inside the critical section.
///
/// Loads and stores are separate so that a second participant inside the
/// section observes a torn value instead of having its update merged.
#[derive(Debug, Default)]
pub struct SharedCounter {
    value: AtomicI64,
}

impl SharedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> i64 {
        self.value.load(Relaxed)
    }

    pub fn set(&self, value: i64) {
        self.value.store(value, Relaxed);
    }

    pub fn reset(&self) {
        self.set(0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// Just entered, before the increment.
    Entered,
    /// After the increment, before the decrement.
    Incremented,
    /// After the decrement, about to leave.
    Decremented,
}

impl Checkpoint {
    pub fn expected(self) -> i64 {
        match self {
            Checkpoint::Entered | Checkpoint::Decremented => 0,
            Checkpoint::Incremented => 1,
        }
    }
}

impl Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checkpoint::Entered => write!(f, "on entry"),
            Checkpoint::Incremented => write!(f, "after increment"),
            Checkpoint::Decremented => write!(f, "after decrement"),
        }
    }
}

/// Mutual exclusion was broken: the counter held an impossible value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub participant: usize,
    pub checkpoint: Checkpoint,
    pub observed: i64,
}

impl Violation {
    pub fn expected(&self) -> i64 {
        self.checkpoint.expected()
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count = {} (expected {} {}, participant {})",
            self.observed,
            self.expected(),
            self.checkpoint,
            self.participant
        )
    }
}

impl Error for Violation {}

#[inline]
fn check(
    counter: &SharedCounter,
    participant: usize,
    checkpoint: Checkpoint,
    observer: &mut impl FnMut(Checkpoint, i64),
) -> Result<(), Violation> {
    let observed = counter.get();
    observer(checkpoint, observed);
    if observed == checkpoint.expected() {
        Ok(())
    } else {
        Err(Violation {
            participant,
            checkpoint,
            observed,
        })
    }
}

/// The body of one critical section, reporting every checkpoint to `observer`.
///
/// Stops at the first failed check and leaves the counter as it found it then.
pub fn critical_section_with(
    counter: &SharedCounter,
    participant: usize,
    mut observer: impl FnMut(Checkpoint, i64),
) -> Result<(), Violation> {
    check(counter, participant, Checkpoint::Entered, &mut observer)?;
    counter.set(counter.get() + 1);
    check(counter, participant, Checkpoint::Incremented, &mut observer)?;
    counter.set(counter.get() - 1);
    check(counter, participant, Checkpoint::Decremented, &mut observer)
}

#[inline]
pub fn critical_section(counter: &SharedCounter, participant: usize) -> Result<(), Violation> {
    critical_section_with(counter, participant, |_, _| {})
}

/// Run `iterations` acquire / critical section / release rounds as participant `id`.
///
/// Returns the number of completed rounds, which is less than `iterations` if
/// another participant raised `abort`. On a violation the lock is released
/// before returning so that the other participant is not left waiting, and
/// `abort` is raised to stop everyone else.
pub fn run_participant<L>(
    lock: &L,
    id: usize,
    iterations: u64,
    counter: &SharedCounter,
    abort: &AtomicBool,
) -> Result<u64, Violation>
where
    L: ParticipantLock + ?Sized,
{
    for round in 0..iterations {
        if abort.load(Relaxed) {
            log::debug!("participant {} stopped after {} rounds", id, round);
            return Ok(round);
        }

        lock.acquire(id);
        let checked = critical_section(counter, id);
        lock.release(id);

        if let Err(violation) = checked {
            abort.store(true, Relaxed);
            return Err(violation);
        }
    }
    Ok(iterations)
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use crate::spin_lock::SpinLock;

    #[test]
    fn single_entry_observes_zero_one_zero() {
        let counter = SharedCounter::new();
        let mut seen = vec![];

        critical_section_with(&counter, 0, |checkpoint, value| seen.push((checkpoint, value)))
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (Checkpoint::Entered, 0),
                (Checkpoint::Incremented, 1),
                (Checkpoint::Decremented, 0),
            ]
        );
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn occupied_section_is_reported_with_raw_value() {
        let counter = SharedCounter::new();
        counter.set(1);

        let violation = critical_section(&counter, 1).unwrap_err();

        assert_eq!(violation.observed, 1);
        assert_eq!(violation.expected(), 0);
        assert_eq!(violation.checkpoint, Checkpoint::Entered);
        assert_eq!(violation.participant, 1);
        assert_eq!(
            violation.to_string(),
            "count = 1 (expected 0 on entry, participant 1)"
        );
    }

    #[test]
    fn single_participant_single_iteration() {
        let lock = SpinLock::new();
        let counter = SharedCounter::new();
        let abort = AtomicBool::new(false);

        assert_eq!(run_participant(&lock, 0, 1, &counter, &abort), Ok(1));
        assert_eq!(counter.get(), 0);
        assert!(lock.try_lock());
    }

    #[test]
    fn violation_releases_lock_and_raises_abort() {
        let lock = SpinLock::new();
        let counter = SharedCounter::new();
        let abort = AtomicBool::new(false);
        counter.set(7);

        let violation = run_participant(&lock, 0, 10, &counter, &abort).unwrap_err();

        assert_eq!(violation.observed, 7);
        assert!(abort.load(Relaxed));
        assert!(lock.try_lock());
    }

    #[test]
    fn raised_abort_stops_before_first_round() {
        let lock = SpinLock::new();
        let counter = SharedCounter::new();
        let abort = AtomicBool::new(true);

        assert_eq!(run_participant(&lock, 1, 1_000, &counter, &abort), Ok(0));
    }

    #[test]
    fn reset_clears_counter() {
        let counter = SharedCounter::new();
        counter.set(3);
        counter.reset();
        assert_eq!(counter.get(), 0);
    }
}
