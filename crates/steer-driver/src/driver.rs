//! Non-interactive command-line run driver.
//!
//! ```text
//!   Uninitialized --init--> Initialized --run--> Finished
//!         ^                                         |
//!         +-----------------finish-----------------+
//! ```
//!
//! The driver owns the engine for the duration of a run: it steps the
//! simulation to completion in a synchronous loop, optionally records a
//! results test case, and exposes the engine's diagnostic modules. It is
//! single-threaded and deliberately supports none of the interactive
//! controls; see the [`EngineController`] impl.

use std::path::Path;

use steer_scenario::{ScenarioAgent, ScenarioDocument, TestCaseWriter, WorldBounds, WriteConfig, WriteError};

use crate::controller::EngineController;
use crate::engine::{EngineError, SimulationEngine};
use crate::options::SimulationOptions;

/// Name of the scenario diagnostic module.
pub const SCENARIO_MODULE: &str = "scenario";

/// Sentinel returned by the diagnostic queries when a required module is
/// not loaded. Historical consumers match on this exact string.
pub const MISSING_MODULE_SENTINEL: &str = "EXIT_SUCCESS_";

/// Lifecycle state of a [`CommandLineDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No engine is loaded
    Uninitialized,
    /// Engine started, ready to run
    Initialized,
    /// Run complete, diagnostics readable, awaiting finish
    Finished,
}

/// Errors raised by the run driver.
#[derive(Debug)]
pub enum DriverError {
    /// `init` was called on an already-initialized driver
    AlreadyInitialized,
    /// An operation requiring a loaded engine was called without one
    NotInitialized,
    /// An interactive control was invoked on the non-interactive driver
    UnsupportedControl(&'static str),
    /// Live agent list and recorded initial conditions differ in length
    AgentListMismatch { live: usize, recorded: usize },
    /// The two diagnostic modules produced different line counts
    DiagnosticLineMismatch { scenario: usize, steering: usize },
    /// The engine failed during startup
    Engine(EngineError),
    /// The results test case could not be written
    Write(WriteError),
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverError::AlreadyInitialized => write!(f, "driver is already initialized"),
            DriverError::NotInitialized => write!(f, "driver is not initialized"),
            DriverError::UnsupportedControl(name) => {
                write!(f, "interactive control '{}' is not supported by the command-line driver", name)
            }
            DriverError::AgentListMismatch { live, recorded } => write!(
                f,
                "live agent count {} does not match recorded initial conditions {}",
                live, recorded
            ),
            DriverError::DiagnosticLineMismatch { scenario, steering } => write!(
                f,
                "diagnostic line counts differ: scenario {} vs steering {}",
                scenario, steering
            ),
            DriverError::Engine(e) => write!(f, "engine error: {}", e),
            DriverError::Write(e) => write!(f, "results output error: {}", e),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Engine(e) => Some(e),
            DriverError::Write(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for DriverError {
    fn from(e: EngineError) -> Self {
        DriverError::Engine(e)
    }
}

impl From<WriteError> for DriverError {
    fn from(e: WriteError) -> Self {
        DriverError::Write(e)
    }
}

/// Derives the results output base name from a scenario path.
///
/// The scenario file's four-character extension (`.scn`) is stripped and
/// `Results` is appended; the writer adds its own `.xml` extension. The
/// strip is by character count, not by extension lookup, matching the
/// historical naming scheme.
pub fn results_destination(scenario: &Path) -> String {
    let full = scenario.to_string_lossy();
    let mut chars = full.chars();
    for _ in 0..4 {
        chars.next_back();
    }
    format!("{}Results", chars.as_str())
}

/// Runs an engine from start to finish without user interaction.
///
/// The engine type is injectable for tests via [`with_engine`]; `init`
/// otherwise constructs it through `Default`.
///
/// [`with_engine`]: CommandLineDriver::with_engine
pub struct CommandLineDriver<E: SimulationEngine + Default> {
    state: DriverState,
    options: SimulationOptions,
    engine: Option<E>,
    writer: Option<TestCaseWriter>,
}

impl<E: SimulationEngine + Default> Default for CommandLineDriver<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SimulationEngine + Default> CommandLineDriver<E> {
    /// Creates an uninitialized driver.
    pub fn new() -> Self {
        Self {
            state: DriverState::Uninitialized,
            options: SimulationOptions::default(),
            engine: None,
            writer: None,
        }
    }

    /// Creates an uninitialized driver around a pre-built engine.
    ///
    /// The engine is not touched until `init`.
    pub fn with_engine(engine: E) -> Self {
        Self {
            state: DriverState::Uninitialized,
            options: SimulationOptions::default(),
            engine: Some(engine),
            writer: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The options the driver was initialized with.
    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    /// Starts the engine with the given options.
    ///
    /// Not idempotent: a second `init` without an intervening `finish` is
    /// an error, checked before the engine is touched.
    pub fn init(&mut self, options: SimulationOptions) -> Result<(), DriverError> {
        if self.state != DriverState::Uninitialized {
            return Err(DriverError::AlreadyInitialized);
        }

        let mut engine = self.engine.take().unwrap_or_default();
        engine.init(&options)?;

        if options.output_results {
            self.writer = Some(TestCaseWriter::new());
        }
        tracing::info!(scenario = %options.scenario.display(), "engine initialized");

        self.options = options;
        self.engine = Some(engine);
        self.state = DriverState::Initialized;
        Ok(())
    }

    /// Runs the simulation to completion.
    ///
    /// Steps the engine until it reports it is done; there is no external
    /// frame cap or cancellation signal. When results output was
    /// requested, the test case is recorded between the last frame and
    /// the engine's postprocess/cleanup phases. Postprocess and cleanup
    /// always run, even when the results write fails.
    pub fn run(&mut self) -> Result<(), DriverError> {
        if self.state != DriverState::Initialized {
            return Err(DriverError::NotInitialized);
        }

        let engine = self.engine.as_mut().ok_or(DriverError::NotInitialized)?;
        engine.initialize_simulation();
        engine.preprocess_simulation();

        tracing::info!("entering simulation loop");
        let mut frames: u64 = 0;
        while engine.update(false) {
            frames += 1;
        }
        tracing::info!(frames, "simulation loop complete");

        let output_result = if self.writer.is_some() {
            self.output_test_case()
        } else {
            Ok(())
        };

        let engine = self.engine.as_mut().ok_or(DriverError::NotInitialized)?;
        engine.postprocess_simulation();
        engine.cleanup_simulation();

        self.state = DriverState::Finished;
        output_result
    }

    /// Records the run as a results-mode test case.
    ///
    /// Reads live agents, initial conditions, obstacles, and the spatial
    /// database origin from the engine and writes the document next to the
    /// scenario file under the `…Results.xml` name.
    pub fn output_test_case(&mut self) -> Result<(), DriverError> {
        let engine = self.engine.as_ref().ok_or(DriverError::NotInitialized)?;

        let agents = engine.agents();
        let initial = engine.agent_initial_conditions();
        if agents.len() != initial.len() {
            return Err(DriverError::AgentListMismatch {
                live: agents.len(),
                recorded: initial.len(),
            });
        }

        let bounds = {
            let database = engine.spatial_database();
            WorldBounds::from_spatial_origin(database.origin_x(), database.origin_z())
        };

        let destination = results_destination(&self.options.scenario);
        let name = Path::new(&destination)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| destination.clone());

        let mut document = ScenarioDocument::new(name, bounds);
        document.scale = Some(1.0);
        for obstacle in engine.obstacles() {
            document.add_obstacle(obstacle);
        }
        for (agent, conditions) in agents.iter().zip(initial.iter()) {
            document.add_agent(
                ScenarioAgent::new(conditions.clone())
                    .with_trajectory(agent.position_log().to_vec()),
            );
        }

        let writer = self.writer.get_or_insert_with(TestCaseWriter::new);
        writer.write(&document, &destination, WriteConfig::results())?;
        tracing::info!(destination = %destination, agents = document.agent_count(), "wrote results test case");
        Ok(())
    }

    /// Joined per-frame diagnostics of the scenario and steering modules.
    ///
    /// Lines of the two modules are zipped with a single space separator.
    /// When either module is missing the sentinel string is returned
    /// instead; when their line counts differ the call is an error.
    pub fn get_data(&self) -> Result<String, DriverError> {
        let engine = self.engine.as_ref().ok_or(DriverError::NotInitialized)?;

        let scenario = engine.module(SCENARIO_MODULE);
        let steering = engine.module(&self.options.ai_module);
        let (scenario, steering) = match (scenario, steering) {
            (Some(s), Some(a)) => (s, a),
            _ => return Ok(MISSING_MODULE_SENTINEL.to_string()),
        };

        let scenario_data = scenario.data();
        let steering_data = steering.data();
        let scenario_lines: Vec<&str> = scenario_data.lines().collect();
        let steering_lines: Vec<&str> = steering_data.lines().collect();
        if scenario_lines.len() != steering_lines.len() {
            return Err(DriverError::DiagnosticLineMismatch {
                scenario: scenario_lines.len(),
                steering: steering_lines.len(),
            });
        }

        let mut combined = String::new();
        for (left, right) in scenario_lines.iter().zip(steering_lines.iter()) {
            combined.push_str(left);
            combined.push(' ');
            combined.push_str(right);
            combined.push('\n');
        }
        Ok(combined)
    }

    /// Log output of the scenario module, with the steering module's
    /// appended when present. Missing scenario module yields the sentinel.
    pub fn get_log_data(&self) -> Result<String, DriverError> {
        let engine = self.engine.as_ref().ok_or(DriverError::NotInitialized)?;

        let scenario = match engine.module(SCENARIO_MODULE) {
            Some(module) => module,
            None => return Ok(MISSING_MODULE_SENTINEL.to_string()),
        };

        let mut log = scenario.log_data();
        if let Some(steering) = engine.module(&self.options.ai_module) {
            log.push_str(&steering.log_data());
        }
        Ok(log)
    }

    /// Shuts the engine down and releases it.
    pub fn finish(&mut self) -> Result<(), DriverError> {
        let mut engine = self.engine.take().ok_or(DriverError::NotInitialized)?;
        engine.finish();
        self.writer = None;
        self.state = DriverState::Uninitialized;
        tracing::info!("engine finished");
        Ok(())
    }
}

/// The command-line driver is deliberately non-interactive: nothing can
/// be paused, stepped, or reloaded at runtime, and every control reports
/// an explicit error instead of crashing.
impl<E: SimulationEngine + Default> EngineController for CommandLineDriver<E> {
    fn is_startup_control_supported(&self) -> bool {
        false
    }

    fn is_pausing_control_supported(&self) -> bool {
        false
    }

    fn is_paused(&self) -> bool {
        false
    }

    fn load_simulation(&mut self) -> Result<(), DriverError> {
        Err(DriverError::UnsupportedControl("load_simulation"))
    }

    fn unload_simulation(&mut self) -> Result<(), DriverError> {
        Err(DriverError::UnsupportedControl("unload_simulation"))
    }

    fn start_simulation(&mut self) -> Result<(), DriverError> {
        Err(DriverError::UnsupportedControl("start_simulation"))
    }

    fn stop_simulation(&mut self) -> Result<(), DriverError> {
        Err(DriverError::UnsupportedControl("stop_simulation"))
    }

    fn pause_simulation(&mut self) -> Result<(), DriverError> {
        Err(DriverError::UnsupportedControl("pause_simulation"))
    }

    fn unpause_simulation(&mut self) -> Result<(), DriverError> {
        Err(DriverError::UnsupportedControl("unpause_simulation"))
    }

    fn toggle_paused_state(&mut self) -> Result<(), DriverError> {
        Err(DriverError::UnsupportedControl("toggle_paused_state"))
    }

    fn pause_and_step_one_frame(&mut self) -> Result<(), DriverError> {
        Err(DriverError::UnsupportedControl("pause_and_step_one_frame"))
    }
}
