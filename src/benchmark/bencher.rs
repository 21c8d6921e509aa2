use std::{path::PathBuf, sync::Arc};

use itertools::Itertools;
use libtwolock::SharedCounter;

use crate::command_parser::{lock_target::LockTarget, GlobalOpts};

use super::{
    counter_job::{clamp_participants, run_participants},
    records::{write_results, Record},
    BenchResult,
};

pub struct Bencher {
    pub num_thread: usize,
    pub iterations: u64,
    pub targets: Vec<LockTarget>,
    pub pin: bool,
    pub output_path: Option<PathBuf>,
}

impl Bencher {
    pub fn new(
        num_thread: usize,
        iterations: u64,
        targets: Vec<LockTarget>,
        pin: bool,
        output_path: Option<PathBuf>,
    ) -> Self {
        Self {
            num_thread,
            iterations,
            targets,
            pin,
            output_path,
        }
    }

    pub fn from_options(options: &GlobalOpts) -> Self {
        Self::new(
            options.threads,
            options.iterations,
            options.targets(),
            options.pin,
            options.output_path.clone(),
        )
    }

    /// Run every target in order, handing each result to `report` as soon as
    /// its lock finished. Stops at the first failure.
    pub fn benchmark(
        &self,
        mut report: impl FnMut(&BenchResult),
    ) -> anyhow::Result<Vec<BenchResult>> {
        log::info!(
            "benchmarking {} with {} participants x {} iterations",
            self.targets.iter().join(", "),
            self.num_thread,
            self.iterations
        );

        let mut results = Vec::with_capacity(self.targets.len());
        let mut records: Vec<Record> = Vec::new();

        for target in &self.targets {
            if !target.is_sound() {
                log::warn!("{} is not guaranteed to provide mutual exclusion", target);
            }

            let lock = Arc::new(target.to_locktype());
            let name = lock.to_string();
            let participants = clamp_participants(lock.as_ref(), self.num_thread);
            if participants != self.num_thread {
                log::warn!(
                    "{} supports at most {} participants, {} requested",
                    name,
                    participants,
                    self.num_thread
                );
            }

            // fresh counter per lock kind
            let counter = Arc::new(SharedCounter::new());
            let run = run_participants(
                lock,
                &name,
                participants,
                self.iterations,
                self.pin,
                counter,
            )?;

            let result = BenchResult {
                name,
                participants: run.participants,
                iterations: self.iterations,
                elapsed: run.elapsed,
            };
            log::info!(
                "finish benchmark for {}: {} participants x {} iterations in {:?}",
                result.name,
                result.participants,
                result.iterations,
                result.elapsed
            );
            report(&result);
            results.push(result);
            records.extend(run.records);
        }

        if let Some(output_path) = &self.output_path {
            write_results(output_path, &records)?;
            log::info!("records written to {}", output_path.display());
        }

        Ok(results)
    }
}
