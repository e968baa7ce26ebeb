//! Locomotion events.
//!
//! Feedback channels for systems that react to movement without driving
//! it: animation triggers, landing dust, jump sounds. Consumers subscribe
//! with an `EventReader` and never need a reference into the locomotion
//! components.

use bevy::prelude::*;

/// Emitted when a jump impulse is queued for an entity, whether from a
/// direct press, a buffered early jump, or infinite jump.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpedEvent {
    /// The entity that jumped.
    pub entity: Entity,
}

/// Emitted when an airborne entity regains ground contact.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandedEvent {
    /// The entity that landed.
    pub entity: Entity,
}
