//! Tuning configuration components.
//!
//! [`CharacterConfig`] tunes the locomotion engine itself (slope handling
//! and the hard speed clamp), [`PlayerConfig`] tunes the player policy layer
//! (speeds, forces, jump windows), and [`MovementFrame`] defines the basis
//! that maps 2D input into world space for camera-relative movement.

use bevy::prelude::*;

/// Locomotion engine tuning.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct CharacterConfig {
    /// Maximum angle (degrees) at which the character can still gain height
    /// walking up a slope.
    pub max_slope_angle: f32,
    /// Exponent of the slope effort curve. Higher values keep climbing easy
    /// until close to the maximum angle.
    pub slope_effort_exponent: f32,
    /// Hard clamp on the horizontal (X/Z) velocity components, applied
    /// right after the continuous force each tick. 0 disables the clamp.
    pub max_speed: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            max_slope_angle: 45.0,
            slope_effort_exponent: 3.0,
            max_speed: 0.0,
        }
    }
}

impl CharacterConfig {
    /// Builder: set the maximum walkable slope angle in degrees.
    pub fn with_max_slope_angle(mut self, degrees: f32) -> Self {
        self.max_slope_angle = degrees;
        self
    }

    /// Builder: set the slope effort curve exponent.
    pub fn with_slope_effort_exponent(mut self, exponent: f32) -> Self {
        self.slope_effort_exponent = exponent;
        self
    }

    /// Builder: set the hard horizontal speed clamp (0 disables).
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }
}

/// Player policy tuning.
///
/// These parameters belong to the controller, not the engine: the engine
/// only ever sees the [`ForceRequest`](crate::intent::ForceRequest) values
/// the policy derives from them.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct PlayerConfig {
    /// Speed the continuous movement force tapers off towards.
    pub speed: f32,
    /// Acceleration of the continuous movement force while grounded.
    pub force: f32,
    /// Multiplier on `force` while airborne. Airborne control is
    /// intentionally weaker.
    pub air_control_factor: f32,
    /// Impulse applied when a jump fires.
    pub jump_force: f32,
    /// Continuous upward force applied while the jump input is held.
    pub hold_jump_force: f32,
    /// How long the hold force may stay active after a jump.
    pub hold_jump_time: f32,
    /// Time window in which a jump press is still honored if it arrived
    /// before the character landed.
    pub early_jump_window: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 25.0,
            force: 30.0,
            air_control_factor: 0.8,
            jump_force: 5.0,
            hold_jump_force: 10.0,
            hold_jump_time: 0.35,
            early_jump_window: 0.2,
        }
    }
}

impl PlayerConfig {
    /// Tighter preset: faster acceleration, less floaty jumps.
    pub fn responsive() -> Self {
        Self {
            force: 45.0,
            hold_jump_time: 0.25,
            early_jump_window: 0.12,
            ..Default::default()
        }
    }

    /// Builder: set movement speed and force together.
    pub fn with_movement(mut self, speed: f32, force: f32) -> Self {
        self.speed = speed;
        self.force = force;
        self
    }

    /// Builder: set the airborne control multiplier.
    pub fn with_air_control(mut self, factor: f32) -> Self {
        self.air_control_factor = factor;
        self
    }

    /// Builder: set the jump impulse.
    pub fn with_jump_force(mut self, force: f32) -> Self {
        self.jump_force = force;
        self
    }

    /// Builder: set the hold-jump force and its time box.
    pub fn with_hold_jump(mut self, force: f32, time: f32) -> Self {
        self.hold_jump_force = force;
        self.hold_jump_time = time;
        self
    }

    /// Builder: set the early jump window.
    pub fn with_early_jump_window(mut self, window: f32) -> Self {
        self.early_jump_window = window;
        self
    }
}

/// Basis mapping 2D movement input into world space.
///
/// With a camera-driven game the frame is refreshed from the camera's
/// forward and right vectors, flattened onto the horizontal plane, so
/// "forward" on the stick always means "away from the camera". Entities
/// without this component map input directly onto the world X/Z axes.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct MovementFrame {
    forward: Vec3,
    right: Vec3,
}

impl Default for MovementFrame {
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        }
    }
}

impl MovementFrame {
    /// Create a frame from forward and right vectors. Both are flattened
    /// onto the horizontal plane and normalized; degenerate (vertical)
    /// vectors fall back to the default axes.
    pub fn new(forward: Vec3, right: Vec3) -> Self {
        let mut frame = Self::default();
        frame.set(forward, right);
        frame
    }

    /// Refresh the frame, typically from the camera each tick. Flattens
    /// and normalizes; a degenerate vector leaves the previous axis
    /// unchanged.
    pub fn set(&mut self, forward: Vec3, right: Vec3) {
        let flat_forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        if flat_forward != Vec3::ZERO {
            self.forward = flat_forward;
        }
        let flat_right = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();
        if flat_right != Vec3::ZERO {
            self.right = flat_right;
        }
    }

    /// The flattened forward axis.
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// The flattened right axis.
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Map 2D input (x = sideways, y = forward) into a world-space
    /// direction.
    pub fn world_direction(&self, input: Vec2) -> Vec3 {
        self.right * input.x + self.forward * input.y
    }
}
