//! Collision detection and response for axis-aligned rectangles
//!
//! Platforms, powerups and the player body are all centred rectangles. The
//! sweep moves one axis at a time so a body landing on a platform edge slides
//! along it instead of sticking.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::host::EntityHandle;

/// Tolerance for treating touching faces as non-overlapping
const SKIN: f32 = 0.01;
/// Distance within which a resting body stays attached to the floor
const FLOOR_SNAP: f32 = 1.0;

/// Axis-aligned bounding box (Y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap test; rectangles sharing an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x - SKIN && self.max.x > other.min.x + SKIN
    }

    #[inline]
    fn overlaps_y(&self, other: &Aabb) -> bool {
        self.min.y < other.max.y - SKIN && self.max.y > other.min.y + SKIN
    }
}

/// Result of moving a body through the static world
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepResult {
    pub position: Vec2,
    /// Velocity after sliding (blocked axes are zeroed)
    pub velocity: Vec2,
    /// Whether the body ends the move standing on a solid
    pub on_floor: bool,
    /// Solids touched during the move, in contact order
    pub collided: Vec<EntityHandle>,
}

/// Move a body with the given half extents by `velocity * dt`, resolving
/// against static solids. Horizontal motion is resolved first, then vertical.
pub fn sweep_and_slide(
    position: Vec2,
    velocity: Vec2,
    half_extents: Vec2,
    dt: f32,
    solids: impl IntoIterator<Item = (EntityHandle, Aabb)>,
) -> SweepResult {
    let solids: Vec<(EntityHandle, Aabb)> = solids.into_iter().collect();
    let size = half_extents * 2.0;
    let mut pos = position;
    let mut vel = velocity;
    let mut collided = Vec::new();
    let mut on_floor = false;

    // --- Horizontal ---
    let dx = vel.x * dt;
    if dx != 0.0 {
        let body = Aabb::from_center(pos, size);
        let mut target_x = pos.x + dx;
        let mut blocker = None;

        for &(handle, solid) in &solids {
            if !body.overlaps_y(&solid) {
                continue;
            }
            if dx > 0.0 && body.max.x <= solid.min.x + SKIN && body.max.x + dx > solid.min.x {
                let limit = solid.min.x - half_extents.x;
                if limit < target_x {
                    target_x = limit;
                    blocker = Some(handle);
                }
            } else if dx < 0.0 && body.min.x >= solid.max.x - SKIN && body.min.x + dx < solid.max.x
            {
                let limit = solid.max.x + half_extents.x;
                if limit > target_x {
                    target_x = limit;
                    blocker = Some(handle);
                }
            }
        }

        pos.x = target_x;
        if let Some(handle) = blocker {
            vel.x = 0.0;
            collided.push(handle);
        }
    }

    // --- Vertical ---
    let dy = vel.y * dt;
    let body = Aabb::from_center(pos, size);
    let mut target_y = pos.y + dy;
    let mut blocker = None;

    for &(handle, solid) in &solids {
        if !body.overlaps_x(&solid) {
            continue;
        }
        if dy > 0.0 && body.max.y <= solid.min.y + SKIN && body.max.y + dy > solid.min.y {
            // Floor
            let limit = solid.min.y - half_extents.y;
            if limit < target_y {
                target_y = limit;
                blocker = Some((handle, true));
            }
        } else if dy < 0.0 && body.min.y >= solid.max.y - SKIN && body.min.y + dy < solid.max.y {
            // Ceiling
            let limit = solid.max.y + half_extents.y;
            if limit > target_y {
                target_y = limit;
                blocker = Some((handle, false));
            }
        }
    }

    pos.y = target_y;
    if let Some((handle, floor)) = blocker {
        vel.y = 0.0;
        on_floor = floor;
        collided.push(handle);
    }

    // Resting contact: a body with no downward motion stays on the floor it touches
    if !on_floor && vel.y >= 0.0 {
        let body = Aabb::from_center(pos, size);
        let support = solids
            .iter()
            .filter(|(_, solid)| body.overlaps_x(solid))
            .find(|(_, solid)| (solid.min.y - body.max.y).abs() <= FLOOR_SNAP);
        if let Some(&(handle, solid)) = support {
            pos.y = solid.min.y - half_extents.y;
            vel.y = 0.0;
            on_floor = true;
            collided.push(handle);
        }
    }

    SweepResult {
        position: pos,
        velocity: vel,
        on_floor,
        collided,
    }
}
