//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D. Enable with
//! the `rapier3d` feature.

use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::LocomotionBackend;
use crate::character::Character;
use crate::collision::{CollisionData, ProbeReport};
use crate::sensor::GroundSensor;
use crate::LocomotionSet;

/// Rapier3D physics backend for the locomotion core.
///
/// Forces and impulses go through `ExternalForce` / `ExternalImpulse`,
/// velocity through `Velocity`. Ground probing runs as a dedicated system
/// that reads the Rapier context, registered by [`Rapier3dBackendPlugin`]
/// in [`LocomotionSet::Probe`].
pub struct Rapier3dBackend;

impl LocomotionBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        if let Some(mut external) = world.get_mut::<ExternalForce>(entity) {
            external.force += force;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        if let Some(mut external) = world.get_mut::<ExternalImpulse>(entity) {
            external.impulse += impulse;
        } else if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            // Fallback: apply as a velocity change if no ExternalImpulse
            // component is present.
            vel.linvel += impulse;
        }
    }

    fn position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation())
            })
            .unwrap_or(Vec3::ZERO)
    }

    fn set_position(world: &mut World, entity: Entity, position: Vec3) {
        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.translation = position;
        }
    }
}

/// Plugin that sets up Rapier3D-specific systems for the locomotion core.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        // Rapier's external forces persist across steps; clear them before
        // this tick's pipeline accumulates new ones.
        app.add_systems(
            FixedUpdate,
            (clear_external_forces, rapier_ground_probes)
                .chain()
                .in_set(LocomotionSet::Probe),
        );
    }
}

/// Bundle of the Rapier components a locomotion-driven body needs.
#[derive(Bundle)]
pub struct Rapier3dCharacterBundle {
    /// Dynamic rigid body driven by forces.
    pub rigid_body: RigidBody,
    /// Linear and angular velocity.
    pub velocity: Velocity,
    /// Per-tick force accumulator.
    pub external_force: ExternalForce,
    /// One-shot impulse accumulator.
    pub external_impulse: ExternalImpulse,
    /// Axis locks for the body.
    pub locked_axes: LockedAxes,
}

impl Default for Rapier3dCharacterBundle {
    fn default() -> Self {
        Self::rotation_locked()
    }
}

impl Rapier3dCharacterBundle {
    /// A dynamic body that cannot tip over. The usual choice for
    /// characters.
    pub fn rotation_locked() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_force: ExternalForce::default(),
            external_impulse: ExternalImpulse::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
        }
    }
}

fn clear_external_forces(mut forces: Query<&mut ExternalForce, With<Character>>) {
    for mut force in &mut forces {
        force.force = Vec3::ZERO;
        force.torque = Vec3::ZERO;
    }
}

/// Cast the ground probes for every sensor and record the results.
///
/// Three probe kinds, all straight down and all limited to the sensor's
/// ground check distance:
/// - a center ray from the body's reference point;
/// - a "front foot" ray offset along the current movement direction, for
///   slope anticipation;
/// - when the center ray misses, a ring of rays around the body that keeps
///   a character standing on the very edge of a platform grounded.
fn rapier_ground_probes(
    rapier: ReadRapierContext,
    mut sensors: Query<(Entity, &GlobalTransform, &mut GroundSensor, Option<&Character>)>,
) {
    let context = rapier.single();

    for (entity, transform, mut sensor, character) in &mut sensors {
        let origin = transform.translation();
        let max_distance = sensor.ground_check_distance;
        let groups = sensor.collision_groups;

        let center = cast_down(&context, origin, max_distance, entity, groups);

        let forward = character
            .and_then(|c| c.continuous_request())
            .map(|request| request.horizontal_direction())
            .and_then(|direction| {
                let direction = direction.normalize_or_zero();
                if direction == Vec3::ZERO {
                    return None;
                }
                cast_down(
                    &context,
                    origin + direction * sensor.front_foot_offset,
                    max_distance,
                    entity,
                    groups,
                )
            });

        let ring_hit = center.is_none()
            && sensor.ring_radius > 0.0
            && (0..sensor.ring_samples).any(|sample| {
                let angle = TAU * sample as f32 / sensor.ring_samples.max(1) as f32;
                let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * sensor.ring_radius;
                cast_down(&context, origin + offset, max_distance, entity, groups).is_some()
            });

        sensor.record_probe(ProbeReport {
            center,
            forward,
            ring_hit,
        });
    }
}

fn cast_down(
    context: &RapierContext,
    origin: Vec3,
    max_distance: f32,
    exclude: Entity,
    collision_groups: Option<(u32, u32)>,
) -> Option<CollisionData> {
    if max_distance <= 0.0 {
        return None;
    }

    let mut filter = QueryFilter::default()
        .exclude_rigid_body(exclude)
        .exclude_sensors();
    if let Some((memberships, filters)) = collision_groups {
        filter = filter.groups(CollisionGroups::new(
            Group::from_bits_truncate(memberships),
            Group::from_bits_truncate(filters),
        ));
    }

    context
        .cast_ray_and_get_normal(origin, Vec3::NEG_Y, max_distance, true, filter)
        .map(|(hit_entity, intersection)| {
            CollisionData::new(
                intersection.time_of_impact,
                intersection.normal,
                intersection.point,
                Some(hit_entity),
            )
        })
}
