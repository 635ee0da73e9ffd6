//! Run options for the command-line driver.
//!
//! All driver settings are loaded from a TOML options file; scenarios are
//! separate TOML documents loaded by [`load_scenario`]. Scenario files use
//! the `.scn` extension so that results naming (strip the extension, append
//! `Results`) produces clean base names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use steer_scenario::ScenarioDocument;

/// Complete options for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Path to the scenario file to load
    pub scenario: PathBuf,
    /// Whether to record a results test case after the run
    pub output_results: bool,
    /// Name of the steering AI module queried for diagnostics
    pub ai_module: String,
    /// Built-in engine settings
    pub engine: EngineOptions,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            scenario: PathBuf::new(),
            output_results: false,
            ai_module: "sfAI".to_string(),
            engine: EngineOptions::default(),
        }
    }
}

impl SimulationOptions {
    /// Loads options from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_str(&content)
    }

    /// Parses options from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::TomlError)
    }
}

/// Settings consumed by the built-in kinematic engine.
///
/// External engine implementations are free to ignore these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Hard frame cap for a run
    pub max_frames: u64,
    /// Fixed simulation timestep in seconds
    pub timestep: f32,
    /// Seed for random goal-target resolution
    pub seed: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_frames: 1000,
            timestep: 0.05,
            seed: 42,
        }
    }
}

/// Loads a scenario document from a TOML file.
pub fn load_scenario(path: &Path) -> Result<ScenarioDocument, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
    toml::from_str(&content).map_err(ConfigError::TomlError)
}

/// Errors that can occur while loading options or scenarios.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading a file
    IoError(std::io::Error),
    /// Error parsing TOML content
    TomlError(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::TomlError(e) => Some(e),
        }
    }
}

/// Generates a default options file content.
pub fn default_options_toml() -> String {
    r#"# Simulation run options

scenario = "scenarios/crossing.scn"
output_results = false
ai_module = "sfAI"

[engine]
max_frames = 1000
timestep = 0.05
seed = 42
"#
    .to_string()
}
