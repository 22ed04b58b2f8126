//! Deterministic simulation module
//!
//! All gameplay logic lives here. Everything the outside world does (spawning,
//! collision queries, input, animation) goes through the `Host` trait, so the
//! module stays deterministic for a given seed and input sequence:
//! - Fixed timestep driven by the caller
//! - Seeded RNG only
//! - Stable iteration order (spawn order)

pub mod catalog;
pub mod collision;
pub mod player;
pub mod session;
pub mod state;
pub mod streamer;

pub use catalog::{LandingEffect, on_player_landed};
pub use collision::{Aabb, SweepResult, sweep_and_slide};
pub use player::Player;
pub use session::{GameSession, TickStatus};
pub use state::{AnimationCue, Archetype, Facing, OverlayState, Platform, Powerup, SessionPhase};
pub use streamer::{
    LevelStreamer, OPENING_LAYOUT, OpeningPlatform, cleanup_threshold, place_platform_x,
};
