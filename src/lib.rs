//! Sky Climber - an endless vertical platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, level streaming, session state machine)
//! - `host`: Collaborator interface for the render/physics layer, plus a headless host
//! - `tuning`: Data-driven game balance
//! - `ui`: HUD summary fed to the host
//! - `error`: Spawn and configuration errors

pub mod error;
pub mod host;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{SpawnError, TuningError};
pub use host::{HeadlessHost, Host, TickInput};
pub use sim::{GameSession, SessionPhase, TickStatus};
pub use tuning::Tuning;

/// Loop configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the native runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Default viewport used when the host has no window
    pub const DEFAULT_VIEWPORT: (f32, f32) = (800.0, 600.0);
}
