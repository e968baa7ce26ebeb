//! Movement intent types.
//!
//! A [`ForceRequest`] is the immutable value a controller hands to the
//! locomotion engine to express what it wants the body to do. The
//! [`ActionBuffer`] keeps a short timestamped record of discrete actions so
//! policies like jump buffering can look a little way into the past, and
//! [`PlayerInput`] queues asynchronous input events for consumption at the
//! next fixed tick.

use bevy::prelude::*;

/// Action name recorded when the jump input fires.
pub const JUMP_ACTION: &str = "Jump";

/// A force that can be applied to a rigid body.
///
/// Created fresh each time a controller wants to express intent. Continuous
/// requests persist on the character until replaced; instant requests are
/// consumed by the next physics step.
///
/// Negative accelerations or speeds are malformed intent and are clamped to
/// zero on construction rather than propagated as backwards forces.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct ForceRequest {
    /// Desired direction of travel. The caller supplies magnitude through
    /// `acceleration`, so this does not need to be normalized.
    pub direction: Vec3,
    /// Acceleration used to push the body along `direction`.
    pub acceleration: f32,
    /// Speed the force tapers off towards.
    pub speed: f32,
}

impl Default for ForceRequest {
    fn default() -> Self {
        Self {
            direction: Vec3::ZERO,
            acceleration: 0.0,
            speed: 0.0,
        }
    }
}

impl ForceRequest {
    /// Create a request, clamping malformed negative scalars to zero.
    pub fn new(direction: Vec3, acceleration: f32, speed: f32) -> Self {
        if acceleration < 0.0 || speed < 0.0 {
            warn!(
                "ForceRequest with negative acceleration ({acceleration}) or speed ({speed}); \
                 clamping to zero"
            );
        }
        Self {
            direction,
            acceleration: acceleration.max(0.0),
            speed: speed.max(0.0),
        }
    }

    /// Create a straight-up request, as used by jump impulses.
    pub fn vertical(acceleration: f32, speed: f32) -> Self {
        Self::new(Vec3::Y, acceleration, speed)
    }

    /// The horizontal (XZ) part of the direction.
    pub fn horizontal_direction(&self) -> Vec3 {
        Vec3::new(self.direction.x, 0.0, self.direction.z)
    }
}

/// One recorded discrete action.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct BufferedAction {
    /// Simulation time at which the action fired.
    pub timestamp: f32,
    /// Name of the action.
    pub action: String,
}

/// A time-windowed record of discrete action events.
///
/// Each controlled entity owns its own buffer, so recorded actions never
/// leak between characters. At most one entry is recorded per simulation
/// tick: a second record with the same timestamp is rejected. Entries older
/// than `max_lifetime` are discarded lazily on insert, never on read, which
/// keeps reads side-effect free at the cost of an O(n) scan over a buffer
/// that stays tiny in practice.
#[derive(Reflect, Debug, Clone)]
pub struct ActionBuffer {
    entries: Vec<BufferedAction>,
    max_lifetime: f32,
}

impl Default for ActionBuffer {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            max_lifetime: 20.0,
        }
    }
}

impl ActionBuffer {
    /// Create a buffer that forgets entries older than `max_lifetime`
    /// seconds.
    pub fn new(max_lifetime: f32) -> Self {
        if max_lifetime <= 0.0 {
            warn!("ActionBuffer lifetime should be greater than 0 (got {max_lifetime})");
        }
        Self {
            entries: Vec::new(),
            max_lifetime,
        }
    }

    /// Record an action at the given time.
    ///
    /// Returns `false` when an entry with the same timestamp already exists
    /// (at most one action per tick). Old entries are pruned on the way in.
    pub fn record(&mut self, now: f32, action: impl Into<String>) -> bool {
        if self.entries.iter().any(|entry| entry.timestamp == now) {
            return false;
        }
        self.prune(now);
        self.entries.push(BufferedAction {
            timestamp: now,
            action: action.into(),
        });
        true
    }

    /// Whether an action with the given name was recorded within the last
    /// `window` seconds. Does not consume the entry.
    pub fn recorded_within(&self, now: f32, action: &str, window: f32) -> bool {
        self.entries
            .iter()
            .any(|entry| now - entry.timestamp <= window && entry.action == action)
    }

    /// Number of buffered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn prune(&mut self, now: f32) {
        let lifetime = self.max_lifetime;
        self.entries
            .retain(|entry| now - entry.timestamp <= lifetime);
    }
}

/// Queued player input, consumed at the next fixed tick.
///
/// Input events arrive asynchronously relative to the simulation. This
/// component is where they wait: callers write into it from anywhere
/// (keyboard handling, gamepad, AI, network), and the policy tick drains it
/// exactly once, which keeps the simulation deterministic with respect to
/// input timing. Multiple presses between two ticks collapse into one.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct PlayerInput {
    move_input: Vec2,
    jump_pressed: bool,
    jump_released: bool,
}

impl PlayerInput {
    /// Set the current horizontal movement intent (x = sideways,
    /// y = forward). Persists until changed.
    pub fn on_move(&mut self, horizontal: Vec2) {
        self.move_input = horizontal;
    }

    /// Queue a discrete jump press for the next tick.
    pub fn on_jump_pressed(&mut self) {
        self.jump_pressed = true;
    }

    /// Queue a jump release for the next tick.
    pub fn on_jump_released(&mut self) {
        self.jump_released = true;
    }

    /// The current horizontal movement intent.
    pub fn move_input(&self) -> Vec2 {
        self.move_input
    }

    pub(crate) fn take_jump_pressed(&mut self) -> bool {
        std::mem::take(&mut self.jump_pressed)
    }

    pub(crate) fn take_jump_released(&mut self) -> bool {
        std::mem::take(&mut self.jump_released)
    }
}

/// Player policy state: the per-entity action buffer and debug flags.
///
/// Tuning lives in [`PlayerConfig`](crate::config::PlayerConfig); this
/// component owns the state the policy accumulates across ticks.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct PlayerController {
    pub(crate) action_buffer: ActionBuffer,
    infinite_jump: bool,
}

impl PlayerController {
    /// Create a controller with an empty action buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle infinite jump and return the new state. Debug affordance:
    /// bypasses the grounded precondition for jumping, and keeps the
    /// vertical hold force alive regardless of ground state.
    pub fn toggle_infinite_jump(&mut self) -> bool {
        self.infinite_jump = !self.infinite_jump;
        self.infinite_jump
    }

    /// Whether infinite jump is enabled.
    pub fn infinite_jump(&self) -> bool {
        self.infinite_jump
    }

    /// Read access to the recorded actions.
    pub fn action_buffer(&self) -> &ActionBuffer {
        &self.action_buffer
    }
}
