//! Probe result structures.
//!
//! These structures hold the results of physics queries (raycasts) used
//! for ground detection. Backends fill them in once per fixed tick; the
//! ground sensor consumes them.

use bevy::prelude::*;

/// Information about a raycast collision.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionData {
    /// Distance to the hit point (if hit).
    pub distance: f32,
    /// Normal of the surface at hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit (if any).
    pub entity: Option<Entity>,
}

impl CollisionData {
    /// Create a collision result.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }
}

/// Raw ground-probe results for one fixed tick.
///
/// Written by the active backend's probe system at the start of each tick
/// and consumed by [`GroundSensor`](crate::sensor::GroundSensor). Contains
/// the downward probe from the actor's reference point, the "front foot"
/// probe offset along the current movement direction, and whether any of
/// the surrounding-area fallback rays hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeReport {
    /// Downward probe from the actor's reference point.
    pub center: Option<CollisionData>,
    /// Downward probe offset forward along the movement direction.
    pub forward: Option<CollisionData>,
    /// Whether any ray of the surrounding-area ring hit ground.
    pub ring_hit: bool,
}

impl ProbeReport {
    /// A report with no contact at all.
    pub fn miss() -> Self {
        Self::default()
    }

    /// Whether the probes found ground contact (center ray or ring fallback).
    pub fn contact(&self) -> bool {
        self.center.is_some() || self.ring_hit
    }
}
