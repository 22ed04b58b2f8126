//! Game balance and tuning
//!
//! Every gameplay constant lives here so a run can be rebalanced from a JSON
//! file without touching the simulation. Missing fields fall back to defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Data-driven balance for physics, generation and session flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player physics ===
    /// Downward acceleration while airborne (units/s²)
    pub gravity: f32,
    /// Terminal fall speed
    pub max_fall_speed: f32,
    /// Horizontal run speed
    pub x_velocity: f32,
    /// Jump impulse at spawn
    pub base_jump_strength: f32,
    /// Cap reached through rough platforms
    pub max_jump_strength: f32,
    /// Grace window after leaving the floor during which a jump still counts
    pub coyote_time: f32,
    /// Player body size
    pub player_size: Vec2,
    /// Spawn and restart position
    pub spawn_position: Vec2,
    /// Y of the ground line used for score and height
    pub ground_level: f32,

    // === Ice ===
    /// Seconds an icy landing keeps the player sliding
    pub ice_duration: f32,
    /// Fraction of run speed available as acceleration on ice
    pub ice_slip_factor: f32,
    /// Per-tick velocity retention on ice
    pub ice_friction: f32,
    /// Acceleration gain on ice
    pub ice_acceleration: f32,

    // === Scoring ===
    /// Points from the first landing on a gold platform
    pub gold_bonus: f32,
    /// Jump strength added per rough landing
    pub rough_jump_bonus: f32,
    /// Factor applied by each collected powerup
    pub powerup_multiplier: f32,

    // === Generation ===
    /// Vertical rise between consecutive platforms, [min, max)
    pub rise_range: (u32, u32),
    /// Platform width, [min, max)
    pub width_range: (u32, u32),
    /// Horizontal step from the cursor, [min, max_platform_distance)
    pub min_platform_distance: u32,
    /// Reachability bound between consecutive platforms
    pub max_platform_distance: f32,
    /// Pull-back from the bound used by the last placement fallback
    pub fallback_inset: f32,
    /// Horizontal keep-out at both viewport edges
    pub side_margin: f32,
    /// Archetype roll thresholds out of 100: gold below the first, icy below
    /// the second, rough below the third
    pub archetype_thresholds: (u32, u32, u32),
    /// Percent chance of a powerup above a generated platform
    pub powerup_chance: u32,
    /// Height of a powerup above its platform
    pub powerup_lift: f32,
    pub platform_height: f32,
    pub powerup_size: Vec2,
    /// Live platform cap
    pub max_platforms: usize,
    /// Platforms added per generation pass
    pub generation_batch: usize,

    // === Session ===
    /// Y beyond which the player is always dead
    pub death_boundary: f32,
    /// Falling this many viewport heights below the checkpoint kills the player
    pub fall_off_screens: f32,
    /// Seconds spent in the falling state before game over
    pub death_delay: f32,
    /// Upward progress needed to move the checkpoint
    pub checkpoint_step: f32,
    /// Entities this many viewport heights below the best height are discarded
    pub cleanup_screens: f32,
    /// Camera position after a restart
    pub camera_home: Vec2,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 980.0,
            max_fall_speed: 800.0,
            x_velocity: 200.0,
            base_jump_strength: 400.0,
            max_jump_strength: 500.0,
            coyote_time: 0.1,
            player_size: Vec2::new(40.0, 40.0),
            spawn_position: Vec2::new(100.0, 400.0),
            ground_level: 500.0,

            ice_duration: 2.0,
            ice_slip_factor: 0.7,
            ice_friction: 0.9,
            ice_acceleration: 3.0,

            gold_bonus: 100.0,
            rough_jump_bonus: 20.0,
            powerup_multiplier: 1.2,

            rise_range: (60, 120),
            width_range: (80, 150),
            min_platform_distance: 80,
            max_platform_distance: 180.0,
            fallback_inset: 20.0,
            side_margin: 100.0,
            archetype_thresholds: (5, 15, 25),
            powerup_chance: 15,
            powerup_lift: 25.0,
            platform_height: 15.0,
            powerup_size: Vec2::new(20.0, 20.0),
            max_platforms: 100,
            generation_batch: 10,

            death_boundary: 700.0,
            fall_off_screens: 1.5,
            death_delay: 2.0,
            checkpoint_step: 50.0,
            cleanup_screens: 2.0,
            camera_home: Vec2::new(400.0, 300.0),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (unspecified fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the level generator cannot sample from
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason: String| Err(TuningError::Invalid { field, reason });

        let (rise_min, rise_max) = self.rise_range;
        if rise_min >= rise_max {
            return invalid("rise_range", format!("empty range {rise_min}..{rise_max}"));
        }
        let (width_min, width_max) = self.width_range;
        if width_min == 0 || width_min >= width_max {
            return invalid("width_range", format!("empty range {width_min}..{width_max}"));
        }
        if self.min_platform_distance as f32 >= self.max_platform_distance {
            return invalid(
                "min_platform_distance",
                format!(
                    "{} is not below max_platform_distance {}",
                    self.min_platform_distance, self.max_platform_distance
                ),
            );
        }
        let (gold, icy, rough) = self.archetype_thresholds;
        if gold > icy || icy > rough || rough > 100 {
            return invalid(
                "archetype_thresholds",
                format!("({gold}, {icy}, {rough}) must be ascending and at most 100"),
            );
        }
        if self.powerup_chance > 100 {
            return invalid("powerup_chance", format!("{} exceeds 100", self.powerup_chance));
        }
        if self.generation_batch == 0 {
            return invalid("generation_batch", "must be at least 1".to_string());
        }
        Ok(())
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Height score for a given best Y, before the multiplier
    pub fn height_score(&self, highest_y: f32) -> f32 {
        ((self.ground_level - highest_y) / 10.0).max(0.0)
    }
}
