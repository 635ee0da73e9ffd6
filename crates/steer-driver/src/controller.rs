//! Interactive engine control surface.
//!
//! Engine frontends differ in what they let a user do at runtime: a
//! windowed frontend can pause, single-step, and reload, while a batch
//! frontend can do none of these. The capability queries let callers ask
//! before acting instead of discovering support through a crash.

use crate::driver::DriverError;

/// Runtime control capabilities of an engine frontend.
///
/// Implementations that do not support a control return
/// [`DriverError::UnsupportedControl`] from it; the corresponding
/// capability query returns `false`. Callers are expected to check the
/// query first.
pub trait EngineController {
    /// Whether load/unload/start/stop controls work at runtime.
    fn is_startup_control_supported(&self) -> bool;

    /// Whether pause/unpause/single-step controls work at runtime.
    fn is_pausing_control_supported(&self) -> bool;

    /// Whether the simulation is currently paused.
    fn is_paused(&self) -> bool;

    fn load_simulation(&mut self) -> Result<(), DriverError>;
    fn unload_simulation(&mut self) -> Result<(), DriverError>;
    fn start_simulation(&mut self) -> Result<(), DriverError>;
    fn stop_simulation(&mut self) -> Result<(), DriverError>;
    fn pause_simulation(&mut self) -> Result<(), DriverError>;
    fn unpause_simulation(&mut self) -> Result<(), DriverError>;
    fn toggle_paused_state(&mut self) -> Result<(), DriverError>;
    fn pause_and_step_one_frame(&mut self) -> Result<(), DriverError>;
}
