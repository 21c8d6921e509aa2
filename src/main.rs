use std::process::ExitCode;

use benchmark::{benchmark, BenchResult};
use clap::Parser;
use command_parser::*;
use env_logger::Env;
use libtwolock::Violation;

mod benchmark;
mod command_parser;

fn main() -> ExitCode {
    let app = App::parse();

    let level = if app.global_opts.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let report = |result: &BenchResult| println!("{}", result.report_line());

    match benchmark(&app.global_opts, report) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Violation>() {
                Some(violation) => eprintln!("Data race: {}", violation),
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
