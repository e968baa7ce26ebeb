//! # `platformer_locomotion`
//!
//! A slope-aware, force-based 3D platformer locomotion core with physics
//! backend abstraction.
//!
//! This crate provides the character movement layer of a platformer:
//! - Continuous force movement with a speed-based taper and an optional
//!   hard speed clamp
//! - Slope handling: movement intent is projected onto the surface under
//!   the character's "front foot", with an effort curve that makes steep
//!   climbs harder
//! - Coyote time: a grace window after leaving a ledge during which the
//!   character can still jump
//! - Jump buffering: a press shortly before landing still jumps on
//!   touchdown
//! - Hold-to-jump: a time-boxed upward force while the jump input is held,
//!   for variable jump height
//! - Backend abstraction: the core consumes a small trait for forces,
//!   impulses, velocity and ground probes (Rapier3D included)
//!
//! ## Architecture
//!
//! Everything advances on the fixed timestep, in explicitly chained
//! phases ([`LocomotionSet`]):
//!
//! 1. **Probe**: the backend raycasts the collision world and writes a
//!    [`ProbeReport`](collision::ProbeReport) into each
//!    [`GroundSensor`](sensor::GroundSensor)
//! 2. **Sensors**: sensors advance their coyote-time and jump-cooldown
//!    state machines
//! 3. **Policy**: queued player input becomes
//!    [`ForceRequest`](intent::ForceRequest)s on the
//!    [`Character`](character::Character)
//! 4. **Movement**: teleports, then the slope-aware continuous force and
//!    the hard speed clamp
//! 5. **Jumping**: the vertical hold force and any pending jump impulse
//!    (with its momentum reset)
//! 6. **StateSync**: [`Grounded`](state::Grounded) /
//!    [`Airborne`](state::Airborne) markers and landing events
//!
//! ## Usage
//!
//! With the `rapier3d` feature enabled:
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_rapier3d::prelude::*;
//! use platformer_locomotion::prelude::*;
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
//!     .add_plugins(LocomotionPlugin::<Rapier3dBackend>::default())
//!     .run();
//! ```
//!
//! Input handling stays outside the crate: feed whatever device, AI or
//! network source you have into [`PlayerInput`](intent::PlayerInput), and
//! the next fixed tick picks it up.

use bevy::prelude::*;

pub mod backend;
pub mod character;
pub mod collision;
pub mod config;
pub mod events;
pub mod intent;
pub mod sensor;
pub mod slope;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{LocomotionBackend, NoOpBackendPlugin};
    pub use crate::character::Character;
    pub use crate::collision::{CollisionData, ProbeReport};
    pub use crate::config::{CharacterConfig, MovementFrame, PlayerConfig};
    pub use crate::events::{JumpedEvent, LandedEvent};
    pub use crate::intent::{ActionBuffer, ForceRequest, PlayerController, PlayerInput};
    pub use crate::sensor::GroundSensor;
    pub use crate::state::{Airborne, Grounded};
    pub use crate::{LocomotionPlugin, LocomotionSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::Rapier3dBackend;
}

/// Phases of the fixed-tick locomotion pipeline, run in order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Backend probe systems query the collision world.
    Probe,
    /// Ground sensors advance their hysteresis state machines.
    Sensors,
    /// Controllers turn queued input into force requests.
    Policy,
    /// Teleports, the continuous movement force and the speed clamp.
    Movement,
    /// The vertical hold force and pending jump impulses.
    Jumping,
    /// State markers and landing events.
    StateSync,
}

/// Main plugin for the locomotion core.
///
/// Generic over a physics backend `B`, which provides the actual physics
/// operations (ground probes, force application, velocity access).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g. `Rapier3dBackend`)
pub struct LocomotionPlugin<B: backend::LocomotionBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::LocomotionBackend> Default for LocomotionPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::LocomotionBackend> Plugin for LocomotionPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<character::Character>();
        app.register_type::<config::CharacterConfig>();
        app.register_type::<config::PlayerConfig>();
        app.register_type::<config::MovementFrame>();
        app.register_type::<intent::ForceRequest>();
        app.register_type::<intent::PlayerInput>();
        app.register_type::<intent::PlayerController>();
        app.register_type::<sensor::GroundSensor>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        app.add_event::<events::JumpedEvent>();
        app.add_event::<events::LandedEvent>();

        // The pipeline phases run strictly in order; no implicit ordering
        // is assumed anywhere else.
        app.configure_sets(
            FixedUpdate,
            (
                LocomotionSet::Probe,
                LocomotionSet::Sensors,
                LocomotionSet::Policy,
                LocomotionSet::Movement,
                LocomotionSet::Jumping,
                LocomotionSet::StateSync,
            )
                .chain(),
        );

        // The backend plugin registers its probe systems in
        // LocomotionSet::Probe.
        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            (
                systems::tick_ground_sensors.in_set(LocomotionSet::Sensors),
                systems::drive_player_controllers.in_set(LocomotionSet::Policy),
                (
                    systems::apply_teleports::<B>,
                    systems::apply_continuous_forces::<B>,
                )
                    .chain()
                    .in_set(LocomotionSet::Movement),
                systems::apply_jump_forces::<B>.in_set(LocomotionSet::Jumping),
                systems::sync_state_markers.in_set(LocomotionSet::StateSync),
            ),
        );

        app.add_systems(Update, systems::validate_configuration);
    }
}
