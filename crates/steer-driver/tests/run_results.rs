//! Integration tests for the command-line driver.
//!
//! These run the full init/run/finish lifecycle over the built-in
//! kinematic engine, from a scenario file on disk to the recorded
//! `…Results.xml` artifact.

use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use steer_driver::{
    CommandLineDriver, DriverState, EngineController, KinematicEngine, SimulationOptions,
};

const TWO_AGENT_SCENARIO: &str = r#"
name = "crossing"

[bounds]
xmin = -10.0
xmax = 10.0
ymin = 0.0
ymax = 0.0
zmin = -10.0
zmax = 10.0

[[obstacles]]
type = "box"
bounds = { xmin = -1.0, xmax = 1.0, ymin = 0.0, ymax = 1.0, zmin = 4.0, zmax = 6.0 }

[[agents]]
[agents.initial_conditions]
name = "eastbound"
radius = 0.5
position = { x = -5.0, y = 0.0, z = 0.0 }

[[agents.initial_conditions.goals]]
goal_type = "seek_static_target"
target_location = { x = 5.0, y = 0.0, z = 0.0 }
desired_speed = 1.3

[[agents]]
[agents.initial_conditions]
name = "westbound"
radius = 0.5
position = { x = 5.0, y = 0.0, z = 1.0 }

[[agents.initial_conditions.goals]]
goal_type = "seek_static_target"
target_location = { x = -5.0, y = 0.0, z = 1.0 }
desired_speed = 1.3
"#;

/// Writes the two-agent scenario into a temp directory.
fn write_scenario(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("crossing.scn");
    fs::write(&path, TWO_AGENT_SCENARIO).expect("Failed to write scenario");
    path
}

fn run_options(scenario: PathBuf, output_results: bool) -> SimulationOptions {
    SimulationOptions {
        scenario,
        output_results,
        ..SimulationOptions::default()
    }
}

#[test]
fn test_full_run_records_results_file() {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(dir.path());

    let mut driver: CommandLineDriver<KinematicEngine> = CommandLineDriver::new();
    driver.init(run_options(scenario, true)).unwrap();
    driver.run().unwrap();
    assert_eq!(driver.state(), DriverState::Finished);

    let results = dir.path().join("crossingResults.xml");
    assert!(results.exists(), "Expected results file to be recorded");

    let content = fs::read_to_string(results).unwrap();
    assert_eq!(content.matches("\t<agent>").count(), 2);
    assert_eq!(content.matches("<sim_real>").count(), 2);
    assert!(content.contains("<name>eastbound</name>"));
    assert!(content.contains("<name>westbound</name>"));
    assert_eq!(content.matches("\t<obstacle>").count(), 1);
    assert!(content.contains("<SteerBenchTestCase"));
    assert!(content.contains("<scale>1.000000</scale>"));

    driver.finish().unwrap();
    assert_eq!(driver.state(), DriverState::Uninitialized);
}

#[test]
fn test_results_bounds_derive_from_spatial_origin() {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(dir.path());

    let mut driver: CommandLineDriver<KinematicEngine> = CommandLineDriver::new();
    driver.init(run_options(scenario, true)).unwrap();
    driver.run().unwrap();

    // Scenario bounds start at (-10, -10); the recorded bounds are the
    // origin-doubled derivation, not the scenario's own extents.
    let content = fs::read_to_string(dir.path().join("crossingResults.xml")).unwrap();
    assert!(content.contains("<xmin>-10.000000</xmin>"));
    assert!(content.contains("<xmax>-20.000000</xmax>"));
    assert!(content.contains("<ymin>0.000000</ymin>"));
    assert!(content.contains("<ymax>0.000000</ymax>"));
}

#[test]
fn test_run_without_output_flag_writes_nothing() {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(dir.path());

    let mut driver: CommandLineDriver<KinematicEngine> = CommandLineDriver::new();
    driver.init(run_options(scenario, false)).unwrap();
    driver.run().unwrap();

    assert!(!dir.path().join("crossingResults.xml").exists());
}

#[test]
fn test_diagnostics_after_run() {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(dir.path());

    let mut driver: CommandLineDriver<KinematicEngine> = CommandLineDriver::new();
    driver.init(run_options(scenario, false)).unwrap();
    driver.run().unwrap();

    let data = driver.get_data().unwrap();
    assert!(!data.is_empty());
    // Each line is one scenario record joined with one steering record.
    for line in data.lines() {
        assert!(line.starts_with("frame "));
        assert!(line.contains(" moved "));
    }

    let log = driver.get_log_data().unwrap();
    assert!(log.contains("initialized 2 agents"));
    assert!(log.contains("run ended"));
}

#[test]
fn test_double_init_rejected_across_full_lifecycle() {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(dir.path());

    let mut driver: CommandLineDriver<KinematicEngine> = CommandLineDriver::new();
    driver.init(run_options(scenario.clone(), false)).unwrap();
    assert!(driver.init(run_options(scenario.clone(), false)).is_err());

    driver.run().unwrap();
    assert!(driver.init(run_options(scenario.clone(), false)).is_err());

    driver.finish().unwrap();
    driver.init(run_options(scenario, false)).unwrap();
}

#[test]
fn test_interactive_controls_rejected_in_every_state() {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(dir.path());

    let mut driver: CommandLineDriver<KinematicEngine> = CommandLineDriver::new();
    assert!(driver.pause_simulation().is_err());

    driver.init(run_options(scenario, false)).unwrap();
    assert!(driver.start_simulation().is_err());
    assert!(!driver.is_pausing_control_supported());

    driver.run().unwrap();
    assert!(driver.toggle_paused_state().is_err());
}

#[test]
fn test_results_file_is_a_loadable_results_document() {
    let dir = tempdir().unwrap();
    let scenario = write_scenario(dir.path());

    let mut driver: CommandLineDriver<KinematicEngine> = CommandLineDriver::new();
    driver.init(run_options(scenario, true)).unwrap();
    driver.run().unwrap();

    let content = fs::read_to_string(dir.path().join("crossingResults.xml")).unwrap();

    // Trajectories are non-trivial: both agents covered 10 units.
    let samples = content.matches("\t\t<location>").count();
    assert!(samples >= 300, "expected at least 150 samples per agent, got {}", samples);

    // The first recorded sample carries the first frame's timestamp.
    assert!(content.contains("<time>0.050000</time>"));
}
