//! Non-interactive simulation run driver.
//!
//! Owns the lifecycle of a steering simulation engine: start it from a
//! TOML options file, run it to completion in a synchronous loop, record
//! the run as a SteerBench results test case, and expose the engine's
//! diagnostic modules. A small built-in kinematic engine makes the
//! workspace runnable end-to-end; any type implementing
//! [`SimulationEngine`] can be driven the same way.

pub mod controller;
pub mod driver;
pub mod engine;
pub mod kinematic;
pub mod options;

// Re-export engine traits
pub use engine::{EngineError, EngineModule, SimAgent, SimulationEngine, SpatialDatabase};

// Re-export the control surface
pub use controller::EngineController;

// Re-export the driver
pub use driver::{
    results_destination, CommandLineDriver, DriverError, DriverState, MISSING_MODULE_SENTINEL,
    SCENARIO_MODULE,
};

// Re-export configuration
pub use options::{
    default_options_toml, load_scenario, ConfigError, EngineOptions, SimulationOptions,
};

// Re-export the built-in engine
pub use kinematic::KinematicEngine;
