//! Engine collaborator traits.
//!
//! The driver does not own any steering logic; it orchestrates an engine
//! through the narrow interfaces defined here. An engine implementation
//! provides the spatial database, the live agent list, the initial
//! conditions it was loaded from, its obstacle set, and named diagnostic
//! modules.

use steer_scenario::{AgentInitialConditions, ObstacleVariant, TrajectorySample};

use crate::options::SimulationOptions;

/// Read access to the engine's spatial index origin.
///
/// Only the origin is exposed; the results writer derives the world
/// bounds it reports from the origin alone.
pub trait SpatialDatabase {
    fn origin_x(&self) -> f32;
    fn origin_z(&self) -> f32;
}

/// A named engine module that can report diagnostics.
pub trait EngineModule {
    /// Structured per-frame diagnostic data, one record per line.
    fn data(&self) -> String;

    /// Free-form log output accumulated over the run.
    fn log_data(&self) -> String;
}

/// A live agent inside a running engine.
pub trait SimAgent {
    /// Positions recorded over the run, in frame order.
    fn position_log(&self) -> &[TrajectorySample];
}

/// The full engine lifecycle as consumed by the run driver.
///
/// Call order is driver-enforced: `init` once, then
/// `initialize_simulation`, `preprocess_simulation`, repeated `update`
/// until it returns `false`, `postprocess_simulation`,
/// `cleanup_simulation`, and eventually `finish`.
pub trait SimulationEngine {
    /// One-time engine startup from the run options.
    fn init(&mut self, options: &SimulationOptions) -> Result<(), EngineError>;

    /// Prepares a loaded scenario for stepping.
    fn initialize_simulation(&mut self);

    /// Runs once before the first frame.
    fn preprocess_simulation(&mut self);

    /// Advances one frame. Returns `false` when the simulation is done.
    ///
    /// `real_time` requests wall-clock pacing; the non-interactive driver
    /// always passes `false`.
    fn update(&mut self, real_time: bool) -> bool;

    /// Runs once after the last frame.
    fn postprocess_simulation(&mut self);

    /// Tears down per-run state. Diagnostics remain readable afterwards.
    fn cleanup_simulation(&mut self);

    /// Final engine shutdown.
    fn finish(&mut self);

    /// The engine's spatial index.
    fn spatial_database(&self) -> &dyn SpatialDatabase;

    /// Live agents, in the same order as `agent_initial_conditions`.
    fn agents(&self) -> Vec<&dyn SimAgent>;

    /// Initial conditions the scenario was loaded from.
    fn agent_initial_conditions(&self) -> &[AgentInitialConditions];

    /// Obstacle set. Iteration order is not guaranteed to be stable.
    fn obstacles(&self) -> Vec<ObstacleVariant>;

    /// Looks up a diagnostic module by name.
    fn module(&self, name: &str) -> Option<&dyn EngineModule>;
}

/// Errors raised by an engine during startup.
#[derive(Debug)]
pub enum EngineError {
    /// The engine rejected its configuration
    Config(String),
    /// The engine failed to start
    Startup(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Config(msg) => write!(f, "engine configuration error: {}", msg),
            EngineError::Startup(msg) => write!(f, "engine startup error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
