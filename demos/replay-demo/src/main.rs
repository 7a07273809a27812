//! MirrorStep Replay Demo
//!
//! Scores a simulated performer against a looping dance routine and prints
//! one JSON report per sampled step, then a summary.
//!
//! Usage: `replay-demo [mirror|typical|sloppy] [steps] [seed] [config.json]`
//!
//! Set `RUST_LOG=mirrorstep_runtime=debug` to see every step in the log.

use std::env;
use std::fs;

use mirrorstep_core::MirrorError;
use mirrorstep_runtime::{init_logging, LoggingConfig, SessionConfig};
use mirrorstep_test::{run_replay, PerformerProfile};

/// Print every n-th step report
const REPORT_EVERY: u64 = 30;

fn profile_by_name(name: &str) -> Result<PerformerProfile, MirrorError> {
    match name {
        "mirror" => Ok(PerformerProfile::mirror()),
        "typical" => Ok(PerformerProfile::typical()),
        "sloppy" => Ok(PerformerProfile::sloppy()),
        other => Err(MirrorError::InvalidConfig(format!(
            "unknown profile {:?}, expected mirror, typical or sloppy",
            other
        ))),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::default())?;

    let args: Vec<String> = env::args().skip(1).collect();
    let profile = profile_by_name(args.first().map(String::as_str).unwrap_or("typical"))?;
    let steps: u64 = match args.get(1) {
        Some(s) => s.parse()?,
        None => 300,
    };
    let seed: u64 = match args.get(2) {
        Some(s) => s.parse()?,
        None => 42,
    };
    let config = match args.get(3) {
        Some(path) => SessionConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => SessionConfig::default(),
    };

    println!("MirrorStep Replay Demo");
    println!("  profile: {:?}", profile);
    println!("  steps:   {}  seed: {}", steps, seed);
    println!();

    let mut print_error = None;
    let summary = run_replay(config, profile, seed, steps, |report| {
        if report.step % REPORT_EVERY != 0 || print_error.is_some() {
            return;
        }
        match serde_json::to_string(report) {
            Ok(line) => println!("{}", line),
            Err(e) => print_error = Some(e),
        }
    })?;
    if let Some(e) = print_error {
        return Err(e.into());
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
