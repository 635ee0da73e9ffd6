//! SteerBench command-line runner
//!
//! Run with: cargo run -p steer-driver --bin steerbench
//!
//! Examples:
//!   steerbench --scenario scenarios/crossing.scn --output-results
//!   steerbench --options run.toml --print-data

use clap::Parser;
use std::path::PathBuf;

use steer_driver::{CommandLineDriver, KinematicEngine, SimulationOptions};

/// SteerBench command-line runner
#[derive(Parser, Debug)]
#[command(name = "steerbench")]
#[command(about = "Runs a steering scenario to completion and records the results")]
struct Args {
    /// Path to a TOML options file
    #[arg(long)]
    options: Option<PathBuf>,

    /// Scenario file to run (overrides the options file)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Record a results test case next to the scenario file
    #[arg(long)]
    output_results: bool,

    /// Print the joined module diagnostics after the run
    #[arg(long)]
    print_data: bool,
}

fn main() {
    let args = Args::parse();

    let mut options = match &args.options {
        Some(path) => match SimulationOptions::from_file(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("failed to load options from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SimulationOptions::default(),
    };
    if let Some(scenario) = args.scenario {
        options.scenario = scenario;
    }
    if args.output_results {
        options.output_results = true;
    }

    let scenario = options.scenario.clone();
    let mut driver: CommandLineDriver<KinematicEngine> = CommandLineDriver::new();

    if let Err(e) = driver.init(options) {
        eprintln!("init failed: {}", e);
        std::process::exit(1);
    }
    println!("Running scenario {}", scenario.display());

    if let Err(e) = driver.run() {
        eprintln!("run failed: {}", e);
        std::process::exit(1);
    }
    println!("Run complete");

    if args.print_data {
        match driver.get_data() {
            Ok(data) => print!("{}", data),
            Err(e) => {
                eprintln!("diagnostics unavailable: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = driver.finish() {
        eprintln!("finish failed: {}", e);
        std::process::exit(1);
    }
}
