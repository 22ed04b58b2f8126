//! Player body and its physics/input state machine
//!
//! One `physics_step` per tick: horizontal input, jump, gravity and coyote
//! time, sweep-and-slide through the host, then height record, screen clamp
//! and animation cue. Landing effects are applied by the session from the
//! handles this step returns.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::{AnimationCue, Facing};
use crate::host::{EntityHandle, Host, TickInput};
use crate::tuning::Tuning;

/// Below this horizontal speed a grounded player counts as standing still
const IDLE_SPEED: f32 = 0.1;

/// The player-controlled body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub can_double_jump: bool,
    pub has_double_jumped: bool,
    /// Seconds left in which a jump still counts as grounded
    pub coyote_time: f32,
    pub on_ice: bool,
    pub ice_time: f32,
    pub jump_strength: f32,
    /// Product of every multiplier collected this run
    pub score_multiplier: f32,
    /// Smallest Y reached (world up is negative Y)
    pub highest_y: f32,
    pub score: f32,
    /// Bonus points folded into the score, rescaled with the multiplier
    pub bonus: f32,
    pub facing: Facing,
    /// Floor contact reported by the last sweep
    on_floor: bool,
    #[serde(skip)]
    last_cue: Option<AnimationCue>,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.spawn_position,
            vel: Vec2::ZERO,
            size: tuning.player_size,
            grounded: false,
            can_double_jump: true,
            has_double_jumped: false,
            coyote_time: 0.0,
            on_ice: false,
            ice_time: 0.0,
            jump_strength: tuning.base_jump_strength,
            score_multiplier: 1.0,
            highest_y: tuning.spawn_position.y,
            score: 0.0,
            bonus: 0.0,
            facing: Facing::Right,
            on_floor: false,
            last_cue: None,
        }
    }

    /// Restore spawn defaults
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Floor contact from the last sweep
    pub fn on_floor(&self) -> bool {
        self.on_floor
    }

    /// Advance one physics tick. Returns the platforms touched on a fresh
    /// landing (empty on every other tick).
    pub fn physics_step<H: Host>(
        &mut self,
        host: &mut H,
        input: &TickInput,
        tuning: &Tuning,
        dt: f32,
    ) -> Vec<EntityHandle> {
        let was_grounded = self.grounded;
        // Floor contact from the previous sweep decides grounding before any
        // jump is resolved; a jump clears it again for this tick
        self.grounded = self.on_floor;

        self.apply_horizontal_input(input, tuning, dt);
        let jumped = input.jump && self.try_jump();

        if self.on_ice {
            self.ice_time -= dt;
            if self.ice_time <= 0.0 {
                self.on_ice = false;
                self.ice_time = 0.0;
            }
        }

        if self.grounded {
            self.coyote_time = tuning.coyote_time;
            self.has_double_jumped = false;
            self.can_double_jump = true;
        } else {
            self.vel.y = (self.vel.y + tuning.gravity * dt).min(tuning.max_fall_speed);
            self.coyote_time = if was_grounded && !jumped {
                tuning.coyote_time
            } else {
                (self.coyote_time - dt).max(0.0)
            };
        }

        let result = host.sweep_and_slide(self.pos, self.vel, self.size * 0.5, dt);
        let fresh_landing = result.on_floor && !self.on_floor;
        self.pos = result.position;
        self.vel = result.velocity;
        self.on_floor = result.on_floor;

        let landed_on = if fresh_landing {
            self.has_double_jumped = false;
            self.can_double_jump = true;
            result.collided
        } else {
            Vec::new()
        };

        self.record_height(tuning);
        self.clamp_to_viewport(host.viewport_size().x);
        self.update_animation(host);

        landed_on
    }

    /// Set horizontal velocity from input; on ice the velocity drifts instead
    /// of snapping
    fn apply_horizontal_input(&mut self, input: &TickInput, tuning: &Tuning, dt: f32) {
        let direction = input.direction();
        if direction < 0.0 {
            self.facing = Facing::Left;
        } else if direction > 0.0 {
            self.facing = Facing::Right;
        }

        if self.on_ice && self.grounded {
            self.vel.x *= tuning.ice_friction;
            self.vel.x += direction
                * tuning.x_velocity
                * tuning.ice_slip_factor
                * dt
                * tuning.ice_acceleration;
        } else {
            self.vel.x = direction * tuning.x_velocity;
        }
    }

    /// Ground/coyote jump, else double jump. A jump with neither available is
    /// dropped. Returns whether a jump happened.
    fn try_jump(&mut self) -> bool {
        if self.grounded || self.coyote_time > 0.0 {
            self.vel.y = -self.jump_strength;
            self.grounded = false;
            self.coyote_time = 0.0;
            true
        } else if self.can_double_jump && !self.has_double_jumped {
            self.vel.y = -self.jump_strength;
            self.has_double_jumped = true;
            self.can_double_jump = false;
            true
        } else {
            false
        }
    }

    /// Recompute score when a new height record is set
    fn record_height(&mut self, tuning: &Tuning) {
        if self.pos.y < self.highest_y {
            self.highest_y = self.pos.y;
            let score = tuning.height_score(self.highest_y) * self.score_multiplier + self.bonus;
            self.score = self.score.max(score);
        }
    }

    fn clamp_to_viewport(&mut self, viewport_width: f32) {
        let half = self.size.x / 2.0;
        self.pos.x = self.pos.x.min(viewport_width - half).max(half);
    }

    fn update_animation<H: Host>(&mut self, host: &mut H) {
        let cue = if !self.on_floor {
            if self.vel.y < 0.0 {
                AnimationCue::Jump(self.facing)
            } else {
                AnimationCue::Fall(self.facing)
            }
        } else if self.vel.x.abs() < IDLE_SPEED {
            AnimationCue::Idle(self.facing)
        } else {
            AnimationCue::Walk(self.facing)
        };

        if self.last_cue != Some(cue) {
            self.last_cue = Some(cue);
            host.play_animation_cue(cue);
        }
    }

    /// Compound the score multiplier, rescaling the current score immediately
    pub fn apply_score_multiplier(&mut self, multiplier: f32) {
        self.score_multiplier *= multiplier;
        self.score *= multiplier;
        self.bonus *= multiplier;
        log::info!(
            "Score multiplier applied: {:.1}x, total multiplier: {:.2}x",
            multiplier,
            self.score_multiplier
        );
    }

    /// Add flat bonus points
    pub fn award_bonus(&mut self, points: f32) {
        self.bonus += points;
        self.score += points;
    }

    pub fn apply_ice_effect(&mut self, duration: f32) {
        self.on_ice = true;
        self.ice_time = duration;
    }

    pub fn boost_jump(&mut self, amount: f32, cap: f32) {
        self.jump_strength = (self.jump_strength + amount).min(cap);
    }
}
