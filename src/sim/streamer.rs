//! Procedural level streaming
//!
//! Platforms are generated ahead of the player from a cursor that only ever
//! climbs, and discarded once they fall far enough below the best height.
//! Every generated platform is placed within reach of the previous one.

use std::collections::HashSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::player::Player;
use super::state::{Archetype, Platform, Powerup};
use crate::error::SpawnError;
use crate::host::{EntityHandle, EntityKind, Host};
use crate::tuning::Tuning;

/// A hand-placed platform of the opening layout
#[derive(Debug, Clone, Copy)]
pub struct OpeningPlatform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub archetype: Archetype,
}

/// Fixed intro ramp, bottom to top
pub const OPENING_LAYOUT: [OpeningPlatform; 7] = [
    OpeningPlatform { x: 200.0, y: 450.0, width: 120.0, archetype: Archetype::Normal },
    OpeningPlatform { x: 400.0, y: 380.0, width: 100.0, archetype: Archetype::Normal },
    OpeningPlatform { x: 100.0, y: 320.0, width: 80.0, archetype: Archetype::Normal },
    OpeningPlatform { x: 550.0, y: 300.0, width: 90.0, archetype: Archetype::Gold },
    OpeningPlatform { x: 300.0, y: 240.0, width: 110.0, archetype: Archetype::Normal },
    OpeningPlatform { x: 150.0, y: 180.0, width: 100.0, archetype: Archetype::Icy },
    OpeningPlatform { x: 500.0, y: 120.0, width: 80.0, archetype: Archetype::Rough },
];

/// Y below which entities are discarded
pub fn cleanup_threshold(
    player_y: f32,
    last_valid_y: f32,
    viewport_height: f32,
    tuning: &Tuning,
) -> f32 {
    player_y.max(last_valid_y) + viewport_height * tuning.cleanup_screens
}

/// Horizontal placement for the next platform.
///
/// Tries the rolled direction, then the opposite one, then forces a step just
/// inside the reach bound. Each stage clamps into the playable band.
pub fn place_platform_x(
    cursor_x: f32,
    go_left: bool,
    distance: f32,
    width: f32,
    viewport_width: f32,
    tuning: &Tuning,
) -> f32 {
    let margin = tuning.side_margin;
    let max_distance = tuning.max_platform_distance;
    // min before max: a band narrower than the platform resolves to the margin
    let clamp = |x: f32| x.min(viewport_width - width - margin).max(margin);

    let step = |left: bool, d: f32| if left { cursor_x - d } else { cursor_x + d };

    let mut x = clamp(step(go_left, distance));
    if (x - cursor_x).abs() > max_distance {
        x = clamp(step(!go_left, distance));
    }
    if (x - cursor_x).abs() > max_distance {
        x = clamp(step(go_left, max_distance - tuning.fallback_inset));
    }
    x
}

/// Owns the live platform and powerup rosters and the generation cursor
#[derive(Debug, Clone)]
pub struct LevelStreamer {
    rng: Pcg32,
    cursor: Vec2,
    platforms: Vec<Platform>,
    powerups: Vec<Powerup>,
    /// Kinds the host has no template for (warned once)
    missing: HashSet<EntityKind>,
}

impl LevelStreamer {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }

    /// Use an explicit generator (tests pin sequences this way)
    pub fn with_rng(rng: Pcg32) -> Self {
        Self {
            rng,
            cursor: Vec2::new(OPENING_LAYOUT[6].x, OPENING_LAYOUT[6].y),
            platforms: Vec::new(),
            powerups: Vec::new(),
            missing: HashSet::new(),
        }
    }

    /// Generation cursor (position of the last generated platform)
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn powerups(&self) -> &[Powerup] {
        &self.powerups
    }

    pub fn platform_mut(&mut self, handle: EntityHandle) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.handle == handle)
    }

    /// Powerups still waiting to be picked up
    pub fn live_powerup_count(&self) -> usize {
        self.powerups.iter().filter(|p| !p.collected).count()
    }

    /// Spawn the fixed intro layout and seed the cursor from its last platform
    pub fn spawn_opening_layout<H: Host>(&mut self, host: &mut H, tuning: &Tuning) {
        for platform in &OPENING_LAYOUT {
            let pos = Vec2::new(platform.x, platform.y);
            self.spawn_platform(host, tuning, platform.archetype, pos, platform.width);
            self.cursor = pos;
        }
        log::debug!("Opening layout spawned, cursor at {:?}", self.cursor);
    }

    /// One generation pass: add up to a batch of platforms while under the cap.
    /// Returns the number of platforms attempted.
    pub fn generate_ahead<H: Host>(&mut self, host: &mut H, tuning: &Tuning) -> usize {
        let to_add = tuning
            .generation_batch
            .min(tuning.max_platforms.saturating_sub(self.platforms.len()));
        if to_add == 0 {
            return 0;
        }

        let viewport_width = host.viewport_size().x;
        for _ in 0..to_add {
            self.generate_platform(host, tuning, viewport_width);
        }
        log::debug!(
            "Generated {} platforms, {} live, cursor at {:?}",
            to_add,
            self.platforms.len(),
            self.cursor
        );
        to_add
    }

    /// Roll and spawn a single platform (and maybe a powerup) above the cursor
    fn generate_platform<H: Host>(&mut self, host: &mut H, tuning: &Tuning, viewport_width: f32) {
        let (rise_min, rise_max) = tuning.rise_range;
        let (width_min, width_max) = tuning.width_range;

        let new_y = self.cursor.y - self.rng.random_range(rise_min..rise_max) as f32;
        let width = self.rng.random_range(width_min..width_max) as f32;
        let go_left = self.rng.random_range(0..2) == 0;
        let max_step = (tuning.max_platform_distance as u32).max(tuning.min_platform_distance + 1);
        let distance = self.rng.random_range(tuning.min_platform_distance..max_step) as f32;
        let new_x =
            place_platform_x(self.cursor.x, go_left, distance, width, viewport_width, tuning);

        let roll = self.rng.random_range(0..100);
        let archetype = Archetype::from_roll(roll, tuning.archetype_thresholds);
        self.spawn_platform(host, tuning, archetype, Vec2::new(new_x, new_y), width);

        if self.rng.random_range(0..100) < tuning.powerup_chance {
            let span = (width as u32).saturating_sub(tuning.powerup_size.x as u32).max(1);
            let offset = self.rng.random_range(0..span) as f32;
            let pos = Vec2::new(new_x + offset, new_y - tuning.powerup_lift);
            self.spawn_powerup(host, tuning, pos);
        }

        // Cursor advances even if the spawn failed
        self.cursor = Vec2::new(new_x, new_y);
    }

    pub(crate) fn spawn_platform<H: Host>(
        &mut self,
        host: &mut H,
        tuning: &Tuning,
        archetype: Archetype,
        pos: Vec2,
        width: f32,
    ) {
        let size = Vec2::new(width, tuning.platform_height);
        let kind = EntityKind::Platform(archetype);
        match host.spawn_entity(kind, pos, size) {
            Ok(handle) => self.platforms.push(Platform {
                handle,
                archetype,
                pos,
                size,
                used: false,
            }),
            Err(err) => self.report_spawn_failure(kind, err),
        }
    }

    pub(crate) fn spawn_powerup<H: Host>(&mut self, host: &mut H, tuning: &Tuning, pos: Vec2) {
        let size = tuning.powerup_size;
        match host.spawn_entity(EntityKind::Powerup, pos, size) {
            Ok(handle) => self.powerups.push(Powerup {
                handle,
                pos,
                size,
                collected: false,
            }),
            Err(err) => self.report_spawn_failure(EntityKind::Powerup, err),
        }
    }

    fn report_spawn_failure(&mut self, kind: EntityKind, err: SpawnError) {
        match &err {
            SpawnError::ConfigurationMissing(_) => {
                if self.missing.insert(kind) {
                    log::warn!("{err}; continuing without {kind}s");
                }
            }
            SpawnError::TransientSpawnFailure { .. } => log::warn!("Skipping spawn: {err}"),
        }
    }

    /// Pick up every powerup overlapping the player. Returns how many were collected.
    pub fn collect_powerups<H: Host>(
        &mut self,
        host: &mut H,
        player: &mut Player,
        tuning: &Tuning,
    ) -> usize {
        let player_bounds = player.bounds();
        let mut collected = 0;
        self.powerups.retain_mut(|powerup| {
            if !powerup.check_collision(&player_bounds) {
                return true;
            }
            powerup.collected = true;
            player.apply_score_multiplier(tuning.powerup_multiplier);
            host.destroy_entity(powerup.handle);
            collected += 1;
            false
        });
        collected
    }

    /// Discard platforms and powerups below `threshold`, plus collected
    /// powerups. Returns the number of entities removed.
    pub fn cleanup<H: Host>(&mut self, host: &mut H, threshold: f32) -> usize {
        let before = self.platforms.len() + self.powerups.len();

        self.platforms.retain(|platform| {
            let keep = platform.pos.y <= threshold;
            if !keep {
                host.destroy_entity(platform.handle);
            }
            keep
        });
        self.powerups.retain(|powerup| {
            let keep = powerup.pos.y <= threshold && !powerup.collected;
            if !keep {
                host.destroy_entity(powerup.handle);
            }
            keep
        });

        let removed = before - self.platforms.len() - self.powerups.len();
        if removed > 0 {
            log::debug!("Cleanup below y={threshold}: removed {removed} entities");
        }
        removed
    }

    /// Destroy everything and rewind the cursor
    pub fn clear<H: Host>(&mut self, host: &mut H) {
        for platform in self.platforms.drain(..) {
            host.destroy_entity(platform.handle);
        }
        for powerup in self.powerups.drain(..) {
            host.destroy_entity(powerup.handle);
        }
        self.cursor = Vec2::new(OPENING_LAYOUT[6].x, OPENING_LAYOUT[6].y);
    }
}
