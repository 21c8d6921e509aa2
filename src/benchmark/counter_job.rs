use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use anyhow::{anyhow, Context};
use libtwolock::{harness::run_participant, ParticipantLock, SharedCounter, Violation};
use quanta::Clock;

use super::records::Record;

/// Outcome of running one lock to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterRun {
    pub participants: usize,
    pub elapsed: Duration,
    pub records: Vec<Record>,
}

/// Number of participants a lock can actually take for a requested count.
pub fn clamp_participants<L: ParticipantLock + ?Sized>(lock: &L, requested: usize) -> usize {
    match lock.capacity() {
        Some(capacity) if requested > capacity => capacity,
        _ => requested,
    }
}

/// Spawn one thread per participant, each running `iterations` checked
/// critical sections, and time the whole run on the wall clock.
///
/// Returns the first violation any participant reported; a participant that
/// panics or cannot be spawned is a plain error.
pub fn run_participants<L>(
    lock: Arc<L>,
    name: &str,
    participants: usize,
    iterations: u64,
    pin: bool,
    counter: Arc<SharedCounter>,
) -> anyhow::Result<CounterRun>
where
    L: ParticipantLock + ?Sized + 'static,
{
    let num_cpu = thread::available_parallelism().map_or(1, |n| n.get());
    let abort = Arc::new(AtomicBool::new(false));
    let timer = Clock::new();

    let begin = timer.now();

    let handles = (0..participants)
        .map(|id| {
            let lock = lock.clone();
            let counter = counter.clone();
            let abort = abort.clone();
            thread::Builder::new()
                .name(format!("{} participant {}", name, id))
                .spawn(move || {
                    let cpu_id = pin.then_some(id % num_cpu);
                    if let Some(cpu_id) = cpu_id {
                        if !core_affinity::set_for_current(core_affinity::CoreId { id: cpu_id }) {
                            log::warn!("could not pin participant {} to cpu {}", id, cpu_id);
                        }
                    }
                    let timer = Clock::new();
                    let begin = timer.now();
                    let completed = run_participant(lock.as_ref(), id, iterations, &counter, &abort);
                    (cpu_id, completed, timer.now().duration_since(begin))
                })
                .with_context(|| format!("failed to spawn participant {}", id))
        })
        .collect::<Vec<_>>();

    if handles.iter().any(Result::is_err) {
        // participants that did start must not wait for ones that never will
        abort.store(true, Ordering::Relaxed);
    }

    let mut records = Vec::with_capacity(participants);
    let mut failure: Option<anyhow::Error> = None;

    for (id, handle) in handles.into_iter().enumerate() {
        let handle = match handle {
            Ok(handle) => handle,
            Err(e) => {
                failure.get_or_insert(e);
                continue;
            }
        };
        match handle.join() {
            Ok((cpu_id, Ok(completed), elapsed)) => {
                log::debug!("{} participant {} finished {} rounds", name, id, completed);
                records.push(Record {
                    id,
                    cpu_id,
                    thread_num: participants,
                    iterations,
                    completed,
                    elapsed,
                    locktype: name.to_string(),
                });
            }
            Ok((_, Err(violation), _)) => {
                keep_first_violation(&mut failure, violation);
            }
            Err(_e) => {
                abort.store(true, Ordering::Relaxed);
                failure.get_or_insert(anyhow!("participant {} of {} panicked", id, name));
            }
        }
    }

    let elapsed = timer.now().duration_since(begin);

    match failure {
        Some(e) => Err(e),
        None => Ok(CounterRun {
            participants,
            elapsed,
            records,
        }),
    }
}

// A violation says more than any other failure, so it wins.
fn keep_first_violation(failure: &mut Option<anyhow::Error>, violation: Violation) {
    let already = failure
        .as_ref()
        .map_or(false, |e| e.downcast_ref::<Violation>().is_some());
    if !already {
        *failure = Some(violation.into());
    }
}
