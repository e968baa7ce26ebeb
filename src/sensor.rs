//! Ground sensing.
//!
//! [`GroundSensor`] turns raw downward probes into a grounded state with
//! coyote-time hysteresis and a jump cooldown. Backends write a fresh
//! [`ProbeReport`] at the start of every fixed tick; the sensor's own tick
//! then updates its timers. Controllers only ever read from the sensor.

use bevy::prelude::*;

use crate::collision::ProbeReport;

/// Ground sensor component.
///
/// Holds the probe configuration (how far down to look, where the "front
/// foot" sits, the surrounding-area fallback ring) and the grounding state
/// machine. All time-dependent queries take `now` explicitly so the state
/// machine can be exercised without a physics world.
///
/// # Grounding rules
///
/// - `is_grounded` reports `false` unconditionally while the jump cooldown
///   is active, no matter what the probes say.
/// - Otherwise it reports `true` within `coyote_time` seconds of the last
///   successful probe, which keeps a character jumpable for a moment after
///   walking off a ledge.
/// - The cooldown clears only once it has elapsed *and* a fresh probe finds
///   ground, so a jump can never re-arm against the contact it launched
///   from.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct GroundSensor {
    /// Distance below the reference point in which the probe detects ground.
    pub ground_check_distance: f32,
    /// Distance of the front foot from the pivot, along the movement
    /// direction.
    pub front_foot_offset: f32,
    /// Radius of the surrounding-area fallback ring. 0 disables the ring.
    pub ring_radius: f32,
    /// Number of rays in the surrounding-area fallback ring.
    pub ring_samples: u32,
    /// How long until the character is allowed to re-ground after jumping.
    pub jump_cooldown: f32,
    /// Time window in which the sensor still considers itself grounded
    /// after leaving a platform.
    pub coyote_time: f32,
    /// Collision group memberships and filters for the ground probes
    /// (backend-specific bit masks). `None` probes everything.
    pub collision_groups: Option<(u32, u32)>,

    #[reflect(ignore)]
    probe: ProbeReport,
    last_grounded_time: f32,
    jump_timestamp: f32,
    jumping: bool,
}

impl Default for GroundSensor {
    fn default() -> Self {
        Self {
            ground_check_distance: 1.0,
            front_foot_offset: 0.2,
            ring_radius: 0.0,
            ring_samples: 8,
            jump_cooldown: 0.2,
            coyote_time: 0.5,
            collision_groups: None,
            probe: ProbeReport::miss(),
            last_grounded_time: f32::NEG_INFINITY,
            jump_timestamp: f32::NEG_INFINITY,
            jumping: false,
        }
    }
}

impl GroundSensor {
    /// Create a sensor with the default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the ground probe distance.
    pub fn with_ground_check_distance(mut self, distance: f32) -> Self {
        self.ground_check_distance = distance;
        self
    }

    /// Builder: set the front foot offset.
    pub fn with_front_foot_offset(mut self, offset: f32) -> Self {
        self.front_foot_offset = offset;
        self
    }

    /// Builder: enable the surrounding-area fallback ring.
    pub fn with_ring(mut self, radius: f32, samples: u32) -> Self {
        self.ring_radius = radius;
        self.ring_samples = samples;
        self
    }

    /// Builder: set the jump cooldown.
    pub fn with_jump_cooldown(mut self, cooldown: f32) -> Self {
        self.jump_cooldown = cooldown;
        self
    }

    /// Builder: set the coyote time window.
    pub fn with_coyote_time(mut self, time: f32) -> Self {
        self.coyote_time = time;
        self
    }

    /// Builder: restrict probes to the given collision groups.
    pub fn with_collision_groups(mut self, memberships: u32, filters: u32) -> Self {
        self.collision_groups = Some((memberships, filters));
        self
    }

    /// Store this tick's raw probe results. Called by the backend's probe
    /// system before the sensor tick runs.
    pub fn record_probe(&mut self, report: ProbeReport) {
        self.probe = report;
    }

    /// Whether the probes currently report ground contact (center ray, or
    /// the surrounding-area ring when the center ray missed). Disregards
    /// all hysteresis.
    pub fn probe_contact(&self) -> bool {
        self.probe.contact()
    }

    /// The raw probe results recorded for this tick.
    pub fn probe(&self) -> &ProbeReport {
        &self.probe
    }

    /// Whether the sensor considers itself on the ground.
    ///
    /// Always `false` while the jump cooldown is active; otherwise `true`
    /// within `coyote_time` of the last successful probe.
    pub fn is_grounded(&self, now: f32) -> bool {
        if self.jumping {
            return false;
        }
        now <= self.last_grounded_time + self.coyote_time
    }

    /// Normal of the surface below the reference point, or world up when
    /// nothing was hit.
    pub fn ground_normal(&self) -> Vec3 {
        self.probe
            .center
            .map(|hit| hit.normal)
            .unwrap_or(Vec3::Y)
    }

    /// Normal of the surface under the front foot, approximating the slope
    /// the character is about to step onto. Falls back to the center probe
    /// when the front foot missed.
    pub fn forward_ground_normal(&self) -> Vec3 {
        self.probe
            .forward
            .map(|hit| hit.normal)
            .unwrap_or_else(|| self.ground_normal())
    }

    /// Mark the sensor as having just jumped. `is_grounded` returns `false`
    /// until the cooldown has elapsed and ground contact is seen again.
    pub fn set_jumping(&mut self, now: f32) {
        self.jumping = true;
        self.jump_timestamp = now;
    }

    /// Whether the jump cooldown is still active.
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    /// Timestamp of the most recent jump.
    pub fn last_jump_timestamp(&self) -> f32 {
        self.jump_timestamp
    }

    /// Timestamp of the most recent successful ground probe.
    pub fn last_grounded_time(&self) -> f32 {
        self.last_grounded_time
    }

    /// Advance the grounding state machine by one fixed tick.
    ///
    /// The grounded timestamp is refreshed first; only then may the jump
    /// cooldown clear, and only against a fresh contact. Swapping these
    /// steps would open a one-tick window where a character reads as
    /// grounded immediately after jumping.
    pub fn tick(&mut self, now: f32) {
        let contact = self.probe.contact();

        if contact {
            self.last_grounded_time = now;
        }

        if self.jumping && now > self.jump_timestamp + self.jump_cooldown && contact {
            self.jumping = false;
        }
    }
}
