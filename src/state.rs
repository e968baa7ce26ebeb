//! State marker components.
//!
//! These markers mirror the ground sensor's verdict so downstream gameplay
//! systems (animation, footstep audio, AI) can filter queries on them
//! without holding a sensor reference. They are added and removed by the
//! state sync system at the end of each fixed tick.

use bevy::prelude::*;

/// Marker component indicating the character is grounded.
///
/// Mutually exclusive with [`Airborne`]. Reflects the sensor's hysteresis,
/// not the raw probe: a character inside its coyote window still counts as
/// grounded, one inside its jump cooldown does not.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Added when the character leaves ground contact (or jumps). Mutually
/// exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
