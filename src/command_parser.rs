use std::path::PathBuf;

use clap::*;

use self::lock_target::LockTarget;

pub mod lock_target;

pub const DEFAULT_THREADS: usize = 2;
pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

#[derive(Debug, Parser)]
#[clap(name = "two-participant lock benchmark", version)]
/// Benchmark Utility: checks each lock for mutual exclusion and times it
pub struct App {
    #[command(flatten)]
    pub global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Locks to benchmark, in order [default: mutex,spin-lock,peterson,dekker]
    #[arg(long, short, num_args(0..), value_delimiter = ',')]
    pub targets: Option<Vec<LockTarget>>,
    /// Participants per lock; the software locks take at most two
    #[arg(long, short = 'n', default_value_t = DEFAULT_THREADS)]
    pub threads: usize,
    /// Critical-section entries per participant
    #[arg(long, short, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u64,
    /// Pin participant i to core i (modulo the core count)
    #[arg(long, short)]
    pub pin: bool,
    /// Write per-participant records to this CSV file
    #[arg(long, short)]
    pub output_path: Option<PathBuf>,
    #[arg(long, short)]
    pub verbose: bool,
}

impl GlobalOpts {
    pub fn targets(&self) -> Vec<LockTarget> {
        match &self.targets {
            Some(t) if !t.is_empty() => t.clone(),
            _ => LockTarget::default_targets(),
        }
    }
}
