//! Shared simulation types
//!
//! Entity records owned by the level streamer and the session state machine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::host::EntityHandle;

/// Platform archetypes, each with its own landing effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Archetype {
    #[default]
    Normal,
    /// One-shot score bonus
    Gold,
    /// Player slides for a while after landing
    Icy,
    /// Each landing raises jump strength up to the cap
    Rough,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Normal => "normal",
            Archetype::Gold => "gold",
            Archetype::Icy => "icy",
            Archetype::Rough => "rough",
        }
    }

    /// Map a roll in [0, 100) to an archetype using cumulative thresholds
    pub fn from_roll(roll: u32, thresholds: (u32, u32, u32)) -> Self {
        let (gold, icy, rough) = thresholds;
        if roll < gold {
            Archetype::Gold
        } else if roll < icy {
            Archetype::Icy
        } else if roll < rough {
            Archetype::Rough
        } else {
            Archetype::Normal
        }
    }
}

/// A static platform (position is the centre)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub handle: EntityHandle,
    pub archetype: Archetype,
    pub pos: Vec2,
    pub size: Vec2,
    /// Gold only: bonus already paid out
    #[serde(default)]
    pub used: bool,
}

impl Platform {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// A score multiplier pickup (position is the centre)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub handle: EntityHandle,
    pub pos: Vec2,
    pub size: Vec2,
    /// Once set, never cleared
    pub collected: bool,
}

impl Powerup {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Overlap test against the player body; collected powerups never hit
    pub fn check_collision(&self, player_bounds: &Aabb) -> bool {
        !self.collected && self.bounds().intersects(player_bounds)
    }
}

/// Direction the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Animation request sent to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationCue {
    Idle(Facing),
    Walk(Facing),
    Jump(Facing),
    Fall(Facing),
}

impl AnimationCue {
    /// Host-side animation name, e.g. `walk_left`
    pub fn name(&self) -> &'static str {
        match self {
            AnimationCue::Idle(Facing::Left) => "idle_left",
            AnimationCue::Idle(Facing::Right) => "idle_right",
            AnimationCue::Walk(Facing::Left) => "walk_left",
            AnimationCue::Walk(Facing::Right) => "walk_right",
            AnimationCue::Jump(Facing::Left) => "jump_left",
            AnimationCue::Jump(Facing::Right) => "jump_right",
            AnimationCue::Fall(Facing::Left) => "fall_left",
            AnimationCue::Fall(Facing::Right) => "fall_right",
        }
    }
}

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay
    Running,
    /// Player fell; waiting out the death delay
    Dying { elapsed: f32 },
    /// Run ended, waiting for restart
    GameOver,
}

/// Overlay visibility for the host to render
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayState {
    pub falling_visible: bool,
    pub game_over_visible: bool,
    /// e.g. "Final Score: 123", set when the game-over overlay appears
    pub score_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_roll_thresholds() {
        let t = (5, 15, 25);
        assert_eq!(Archetype::from_roll(0, t), Archetype::Gold);
        assert_eq!(Archetype::from_roll(4, t), Archetype::Gold);
        assert_eq!(Archetype::from_roll(5, t), Archetype::Icy);
        assert_eq!(Archetype::from_roll(14, t), Archetype::Icy);
        assert_eq!(Archetype::from_roll(15, t), Archetype::Rough);
        assert_eq!(Archetype::from_roll(24, t), Archetype::Rough);
        assert_eq!(Archetype::from_roll(25, t), Archetype::Normal);
        assert_eq!(Archetype::from_roll(99, t), Archetype::Normal);
    }

    #[test]
    fn test_collected_powerup_never_collides() {
        let mut powerup = Powerup {
            handle: EntityHandle(3),
            pos: Vec2::new(100.0, 100.0),
            size: Vec2::new(20.0, 20.0),
            collected: false,
        };
        let player = Aabb::from_center(Vec2::new(110.0, 110.0), Vec2::new(40.0, 40.0));
        assert!(powerup.check_collision(&player));

        powerup.collected = true;
        assert!(!powerup.check_collision(&player));
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(AnimationCue::Walk(Facing::Left).name(), "walk_left");
        assert_eq!(AnimationCue::Fall(Facing::Right).name(), "fall_right");
    }
}
