//! The locomotion engine's state hub.
//!
//! [`Character`] is the component external callers talk to: controllers and
//! other gameplay systems queue force requests and teleports here, and the
//! fixed-tick systems consume them. The component itself never touches the
//! physics body; only the tick systems do, through the active backend.

use bevy::prelude::*;

use crate::intent::ForceRequest;

/// Central locomotion state for one controlled body.
///
/// Owns the pending force requests and is the only path through which
/// forces reach the rigid body:
///
/// - the *continuous* request persists until replaced and produces a
///   slope-aware, speed-tapered force every tick;
/// - the *instant* request is a one-shot impulse, consumed by the next
///   physics step;
/// - the *vertical hold* scalar is a constant upward force applied every
///   tick until cancelled (the hold-to-jump mechanic; the controller owns
///   its time box);
/// - a pending *teleport* hard-sets the position and zeroes velocity.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct Character {
    continuous: Option<ForceRequest>,
    instant: Option<ForceRequest>,
    vertical_hold: f32,
    pending_teleport: Option<Vec3>,
}

impl Character {
    /// Create a character with no pending requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the continuous force request. It stays active until the next
    /// replacement.
    pub fn request_continuous_force(&mut self, request: ForceRequest) {
        self.continuous = Some(request);
    }

    /// The currently active continuous request, if any.
    pub fn continuous_request(&self) -> Option<&ForceRequest> {
        self.continuous.as_ref()
    }

    /// Drop the continuous request entirely.
    pub fn clear_continuous_force(&mut self) {
        self.continuous = None;
    }

    /// Queue a one-shot impulse for the next physics step. Replaces any
    /// impulse already pending.
    pub fn request_instant_force(&mut self, request: ForceRequest) {
        self.instant = Some(request);
    }

    /// Whether an impulse is waiting to fire.
    pub fn has_instant_force(&self) -> bool {
        self.instant.is_some()
    }

    pub(crate) fn take_instant_force(&mut self) -> Option<ForceRequest> {
        self.instant.take()
    }

    /// Start applying a constant vertical force every tick.
    pub fn request_vertical_hold(&mut self, force: f32) {
        self.vertical_hold = force;
    }

    /// Stop the vertical hold force.
    pub fn cancel_vertical_hold(&mut self) {
        self.vertical_hold = 0.0;
    }

    /// The vertical hold force currently in effect (0 when inactive).
    pub fn vertical_hold(&self) -> f32 {
        self.vertical_hold
    }

    /// Hard-teleport the body at the next tick. Velocity is zeroed so the
    /// character does not carry momentum through a respawn.
    pub fn request_set_position(&mut self, position: Vec3) {
        self.pending_teleport = Some(position);
    }

    /// Whether a teleport is waiting to be applied.
    pub fn has_pending_teleport(&self) -> bool {
        self.pending_teleport.is_some()
    }

    pub(crate) fn take_teleport(&mut self) -> Option<Vec3> {
        self.pending_teleport.take()
    }
}
