//! Host collaborator interface
//!
//! The simulation never touches a renderer or physics engine directly. It asks
//! the host to spawn and destroy entities, reports animation cues, and gets
//! back input snapshots and sweep-and-slide results synchronously within a tick.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_VIEWPORT;
use crate::error::SpawnError;
use crate::sim::collision::{Aabb, SweepResult, sweep_and_slide};
use crate::sim::{AnimationCue, Archetype};

/// Opaque handle to a host-side entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

/// What the host is asked to instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Platform(Archetype),
    Powerup,
}

impl EntityKind {
    /// Whether the body collides with the player during sweep-and-slide
    pub fn is_solid(&self) -> bool {
        matches!(self, EntityKind::Platform(_))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Platform(archetype) => write!(f, "{} platform", archetype.as_str()),
            EntityKind::Powerup => f.write_str("powerup"),
        }
    }
}

/// Input commands for a single tick
///
/// `left`/`right` are held state, the rest are rising edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub restart: bool,
    pub quit: bool,
}

impl TickInput {
    /// Horizontal direction: -1 left, 1 right, 0 none (left wins when both held)
    pub fn direction(&self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }
}

/// Services the simulation consumes from the render/physics layer
pub trait Host {
    /// Instantiate an entity centred at `position`
    fn spawn_entity(
        &mut self,
        kind: EntityKind,
        position: Vec2,
        size: Vec2,
    ) -> Result<EntityHandle, SpawnError>;

    fn destroy_entity(&mut self, handle: EntityHandle);

    fn viewport_size(&self) -> Vec2;

    /// Input snapshot for this tick; edges are consumed by the call
    fn poll_input(&mut self) -> TickInput;

    /// Move a body by `velocity * dt`, sliding along solid entities
    fn sweep_and_slide(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        half_extents: Vec2,
        dt: f32,
    ) -> SweepResult;

    /// Fire-and-forget animation request
    fn play_animation_cue(&mut self, cue: AnimationCue);
}

#[derive(Debug, Clone, Copy)]
struct HostEntity {
    kind: EntityKind,
    bounds: Aabb,
}

/// Windowless host: keeps entity rectangles in memory and resolves movement
/// with swept AABBs. Used by the native runner and the test suite.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    viewport: Vec2,
    entities: BTreeMap<EntityHandle, HostEntity>,
    next_handle: u32,
    held_left: bool,
    held_right: bool,
    pending: TickInput,
    missing_templates: HashSet<EntityKind>,
    failures_remaining: u32,
    cues: Vec<AnimationCue>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(Vec2::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1))
    }
}

impl HeadlessHost {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            entities: BTreeMap::new(),
            next_handle: 1,
            held_left: false,
            held_right: false,
            pending: TickInput::default(),
            missing_templates: HashSet::new(),
            failures_remaining: 0,
            cues: Vec::new(),
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn hold_left(&mut self, held: bool) {
        self.held_left = held;
    }

    pub fn hold_right(&mut self, held: bool) {
        self.held_right = held;
    }

    pub fn press_jump(&mut self) {
        self.pending.jump = true;
    }

    pub fn press_restart(&mut self) {
        self.pending.restart = true;
    }

    pub fn press_quit(&mut self) {
        self.pending.quit = true;
    }

    /// Make every future spawn of `kind` fail with `ConfigurationMissing`
    pub fn remove_template(&mut self, kind: EntityKind) {
        self.missing_templates.insert(kind);
    }

    /// Make the next `count` spawns fail transiently
    pub fn fail_next_spawns(&mut self, count: u32) {
        self.failures_remaining = count;
    }

    pub fn live_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(&handle)
    }

    /// Bounds of a live entity
    pub fn bounds(&self, handle: EntityHandle) -> Option<Aabb> {
        self.entities.get(&handle).map(|e| e.bounds)
    }

    /// Animation cues received so far, oldest first
    pub fn cues(&self) -> &[AnimationCue] {
        &self.cues
    }
}

impl Host for HeadlessHost {
    fn spawn_entity(
        &mut self,
        kind: EntityKind,
        position: Vec2,
        size: Vec2,
    ) -> Result<EntityHandle, SpawnError> {
        if self.missing_templates.contains(&kind) {
            return Err(SpawnError::ConfigurationMissing(kind));
        }
        if self.failures_remaining > 0 {
            self.failures_remaining -= 1;
            return Err(SpawnError::TransientSpawnFailure {
                kind,
                reason: "simulated instantiation failure".into(),
            });
        }

        let handle = EntityHandle(self.next_handle);
        self.next_handle += 1;
        self.entities.insert(
            handle,
            HostEntity {
                kind,
                bounds: Aabb::from_center(position, size),
            },
        );
        Ok(handle)
    }

    fn destroy_entity(&mut self, handle: EntityHandle) {
        self.entities.remove(&handle);
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn poll_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.held_left,
            right: self.held_right,
            ..self.pending
        };
        // Clear one-shot inputs after processing
        self.pending = TickInput::default();
        input
    }

    fn sweep_and_slide(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        half_extents: Vec2,
        dt: f32,
    ) -> SweepResult {
        let solids = self
            .entities
            .iter()
            .filter(|(_, e)| e.kind.is_solid())
            .map(|(handle, e)| (*handle, e.bounds));
        sweep_and_slide(position, velocity, half_extents, dt, solids)
    }

    fn play_animation_cue(&mut self, cue: AnimationCue) {
        self.cues.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_clears_edges_but_keeps_held() {
        let mut host = HeadlessHost::default();
        host.hold_right(true);
        host.press_jump();

        let first = host.poll_input();
        assert!(first.right && first.jump);
        assert_eq!(first.direction(), 1.0);

        let second = host.poll_input();
        assert!(second.right);
        assert!(!second.jump);
    }

    #[test]
    fn test_left_wins_when_both_held() {
        let input = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), -1.0);
    }

    #[test]
    fn test_spawn_and_destroy() {
        let mut host = HeadlessHost::default();
        let handle = host
            .spawn_entity(
                EntityKind::Platform(Archetype::Normal),
                Vec2::new(200.0, 450.0),
                Vec2::new(120.0, 15.0),
            )
            .unwrap();
        assert!(host.contains(handle));
        let bounds = host.bounds(handle).unwrap();
        assert_eq!(bounds.min, Vec2::new(140.0, 442.5));

        host.destroy_entity(handle);
        assert_eq!(host.live_entities(), 0);
    }

    #[test]
    fn test_simulated_failures() {
        let mut host = HeadlessHost::default();
        host.remove_template(EntityKind::Powerup);
        host.fail_next_spawns(1);

        let kind = EntityKind::Platform(Archetype::Icy);
        let err = host.spawn_entity(kind, Vec2::ZERO, Vec2::ONE).unwrap_err();
        assert!(matches!(err, SpawnError::TransientSpawnFailure { .. }));
        assert!(host.spawn_entity(kind, Vec2::ZERO, Vec2::ONE).is_ok());

        let err = host
            .spawn_entity(EntityKind::Powerup, Vec2::ZERO, Vec2::ONE)
            .unwrap_err();
        assert_eq!(err, SpawnError::ConfigurationMissing(EntityKind::Powerup));
    }

    #[test]
    fn test_powerups_are_not_solid() {
        let mut host = HeadlessHost::default();
        host.spawn_entity(
            EntityKind::Powerup,
            Vec2::new(100.0, 450.0),
            Vec2::new(20.0, 20.0),
        )
        .unwrap();

        let result = host.sweep_and_slide(
            Vec2::new(100.0, 420.0),
            Vec2::new(0.0, 600.0),
            Vec2::new(20.0, 20.0),
            0.1,
        );
        assert!(!result.on_floor);
        assert!(result.collided.is_empty());
        assert!((result.position.y - 480.0).abs() < 0.001);
    }
}
