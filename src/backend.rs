//! Physics backend abstraction.
//!
//! The locomotion core never talks to a physics engine directly. This
//! module defines the trait a backend must implement to supply the handful
//! of host-engine services the core consumes: force and impulse
//! application, velocity and position access, the fixed timestep, and a
//! plugin hook through which the backend registers its ground-probe
//! systems.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// Implement this to integrate a physics engine with the locomotion core.
/// The core's tick systems are generic over a backend `B` and reach the
/// rigid body exclusively through these methods.
///
/// Besides the methods below, a backend owns ground probing: its
/// [`plugin`](LocomotionBackend::plugin) must register one or more systems
/// in [`LocomotionSet::Probe`](crate::LocomotionSet::Probe) that write a
/// fresh [`ProbeReport`](crate::collision::ProbeReport) into every
/// [`GroundSensor`](crate::sensor::GroundSensor) each fixed tick (see the
/// `rapier3d` feature's backend for the reference implementation).
pub trait LocomotionBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity.
    fn velocity(world: &World, entity: Entity) -> Vec3;

    /// Set the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Apply a force to an entity. Forces accumulate over the physics
    /// timestep.
    fn apply_force(world: &mut World, entity: Entity, force: Vec3);

    /// Apply an impulse to an entity: an instantaneous change in momentum.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3);

    /// Get the current world position of an entity.
    fn position(world: &World, entity: Entity) -> Vec3;

    /// Hard-set the world position of an entity.
    fn set_position(world: &mut World, entity: Entity, position: Vec3);

    /// Get the fixed timestep delta time.
    fn fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&dt| dt > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}

/// Empty plugin for backends that don't need additional setup.
///
/// A core with this backend and no probe systems simply never reports
/// ground contact; movement degrades to airborne behavior instead of
/// failing.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
