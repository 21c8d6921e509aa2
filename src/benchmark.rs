use std::time::Duration;

use crate::command_parser::GlobalOpts;

use self::bencher::Bencher;

pub mod bencher;
pub mod counter_job;
mod helper;
pub mod records;

/// Timing of one lock kind, produced once its run completed cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchResult {
    pub name: String,
    pub participants: usize,
    pub iterations: u64,
    pub elapsed: Duration,
}

impl BenchResult {
    /// `<name>: <seconds>`
    pub fn report_line(&self) -> String {
        format!("{}: {}", self.name, self.elapsed.as_secs_f64())
    }
}

pub fn benchmark(
    options: &GlobalOpts,
    report: impl FnMut(&BenchResult),
) -> anyhow::Result<Vec<BenchResult>> {
    Bencher::from_options(options).benchmark(report)
}
