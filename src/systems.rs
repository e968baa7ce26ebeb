//! Fixed-tick locomotion systems.
//!
//! One fixed-rate step advances all locomotion state deterministically.
//! The pipeline runs in chained phases (see [`LocomotionSet`]): the backend
//! probes the collision world, sensors tick their hysteresis, the player
//! policy turns queued input into force requests, and the engine resolves
//! those requests into forces on the rigid body. No other system mutates
//! the body.
//!
//! [`LocomotionSet`]: crate::LocomotionSet

use bevy::prelude::*;

use crate::backend::LocomotionBackend;
use crate::character::Character;
use crate::config::{CharacterConfig, MovementFrame, PlayerConfig};
use crate::events::{JumpedEvent, LandedEvent};
use crate::intent::{ForceRequest, PlayerController, PlayerInput, JUMP_ACTION};
use crate::sensor::GroundSensor;
use crate::slope::{effort_multiplier, project_onto_slope, slope_angle};
use crate::state::{Airborne, Grounded};

/// Advance every ground sensor's hysteresis by one tick.
///
/// Runs after the backend's probe systems, so the sensor sees this tick's
/// contact state.
pub fn tick_ground_sensors(time: Res<Time>, mut sensors: Query<&mut GroundSensor>) {
    let now = time.elapsed_secs();
    for mut sensor in &mut sensors {
        sensor.tick(now);
    }
}

/// Translate queued player input into force requests.
///
/// Policy order within a tick:
/// 1. the current movement intent becomes the continuous request, with
///    acceleration attenuated by the air control factor when airborne;
/// 2. a queued jump press is recorded in the action buffer and, if the
///    sensor allows it (grounded, coyote window, or infinite jump), fires
///    immediately with a full hold window;
/// 3. a queued release cancels the vertical hold (early release shortens
///    the jump);
/// 4. landing with a recent enough press in the buffer fires the jump and
///    cancels the hold right away, so a buffered jump never gets a hold
///    window;
/// 5. the hold force is cancelled once the character is grounded again or
///    its time box has elapsed, unless infinite jump keeps it alive.
pub fn drive_player_controllers(
    time: Res<Time>,
    mut jumps: EventWriter<JumpedEvent>,
    mut players: Query<(
        Entity,
        &PlayerConfig,
        &mut PlayerController,
        &mut PlayerInput,
        &mut Character,
        &mut GroundSensor,
        Option<&MovementFrame>,
    )>,
) {
    let now = time.elapsed_secs();

    for (entity, config, mut controller, mut input, mut character, mut sensor, frame) in
        &mut players
    {
        let move_input = input.move_input();
        let direction = match frame {
            Some(frame) => frame.world_direction(move_input),
            None => Vec3::new(move_input.x, 0.0, move_input.y),
        };
        let acceleration = if sensor.is_grounded(now) {
            config.force
        } else {
            config.force * config.air_control_factor
        };
        character.request_continuous_force(ForceRequest::new(direction, acceleration, config.speed));

        if input.take_jump_pressed() {
            controller.action_buffer.record(now, JUMP_ACTION);
            if sensor.is_grounded(now) || controller.infinite_jump() {
                fire_jump(entity, config, &mut character, &mut sensor, now, &mut jumps);
            }
        }

        if input.take_jump_released() {
            character.cancel_vertical_hold();
        }

        if sensor.is_grounded(now)
            && controller
                .action_buffer
                .recorded_within(now, JUMP_ACTION, config.early_jump_window)
        {
            fire_jump(entity, config, &mut character, &mut sensor, now, &mut jumps);
            character.cancel_vertical_hold();
        }

        if !controller.infinite_jump()
            && (sensor.is_grounded(now) || sensor.last_jump_timestamp() + config.hold_jump_time < now)
        {
            character.cancel_vertical_hold();
        }
    }
}

fn fire_jump(
    entity: Entity,
    config: &PlayerConfig,
    character: &mut Character,
    sensor: &mut GroundSensor,
    now: f32,
    jumps: &mut EventWriter<JumpedEvent>,
) {
    character.request_instant_force(ForceRequest::vertical(config.jump_force, config.speed));
    sensor.set_jumping(now);
    character.request_vertical_hold(config.hold_jump_force);
    jumps.send(JumpedEvent { entity });
}

/// Apply pending teleports: zero the velocity, then hard-set the position.
pub fn apply_teleports<B: LocomotionBackend>(world: &mut World) {
    let mut teleports = Vec::new();
    let mut query = world.query::<(Entity, &mut Character)>();
    for (entity, mut character) in query.iter_mut(world) {
        if let Some(position) = character.take_teleport() {
            teleports.push((entity, position));
        }
    }

    for (entity, position) in teleports {
        B::set_velocity(world, entity, Vec3::ZERO);
        B::set_position(world, entity, position);
    }
}

/// Resolve the continuous force request for every character.
///
/// The requested direction is bent along the slope under the front foot,
/// its vertical component scaled by the slope effort curve, and the
/// resulting force tapered by how much of the requested speed is already
/// reached, so velocity approaches `request.speed` asymptotically instead
/// of overshooting. The hard horizontal clamp runs right after, in the
/// same tick.
///
/// A character without a ground sensor keeps moving on a flat-ground
/// fallback (world-up normal, full effort).
pub fn apply_continuous_forces<B: LocomotionBackend>(world: &mut World) {
    let characters: Vec<(Entity, ForceRequest, CharacterConfig, Vec3)> = world
        .query::<(
            Entity,
            &Character,
            Option<&CharacterConfig>,
            Option<&GroundSensor>,
        )>()
        .iter(world)
        .filter_map(|(entity, character, config, sensor)| {
            character.continuous_request().map(|request| {
                let normal = sensor
                    .map(|s| s.forward_ground_normal())
                    .unwrap_or(Vec3::Y);
                (
                    entity,
                    *request,
                    config.copied().unwrap_or_default(),
                    normal,
                )
            })
        })
        .collect();

    for (entity, request, config, ground_normal) in characters {
        let mut direction = project_onto_slope(request.direction, ground_normal);
        let angle = slope_angle(request.direction, ground_normal);
        let effort = effort_multiplier(angle, config.max_slope_angle, config.slope_effort_exponent);
        direction.y *= effort;

        let velocity = B::velocity(world, entity);
        let remaining = if request.speed > 0.0 {
            (1.0 - velocity.length() / request.speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        B::apply_force(world, entity, direction * (request.acceleration * remaining));

        if config.max_speed > 0.0 {
            let mut clamped = B::velocity(world, entity);
            clamped.x = clamped.x.clamp(-config.max_speed, config.max_speed);
            clamped.z = clamped.z.clamp(-config.max_speed, config.max_speed);
            B::set_velocity(world, entity, clamped);
        }
    }
}

/// Apply the vertical hold force and fire any pending jump impulse.
///
/// The hold force requires an active continuous request, matching the
/// movement pipeline it belongs to. A pending impulse first resets
/// momentum so the jump always starts from a vertical velocity of exactly
/// zero, then fires exactly once.
pub fn apply_jump_forces<B: LocomotionBackend>(world: &mut World) {
    let mut pending: Vec<(Entity, f32, Option<ForceRequest>, Vec3)> = Vec::new();
    let mut query = world.query::<(Entity, &mut Character)>();
    for (entity, mut character) in query.iter_mut(world) {
        let hold = if character.continuous_request().is_some() {
            character.vertical_hold()
        } else {
            0.0
        };
        let movement_direction = character
            .continuous_request()
            .map(|request| request.horizontal_direction())
            .unwrap_or(Vec3::ZERO);
        let instant = character.take_instant_force();

        if hold != 0.0 || instant.is_some() {
            pending.push((entity, hold, instant, movement_direction));
        }
    }

    for (entity, hold, instant, movement_direction) in pending {
        if hold != 0.0 {
            B::apply_force(world, entity, Vec3::Y * hold);
        }

        if let Some(request) = instant {
            let velocity = B::velocity(world, entity);
            B::set_velocity(world, entity, reset_momentum(velocity, movement_direction, true));
            B::apply_impulse(world, entity, request.direction * request.acceleration);
        }
    }
}

/// Cancel momentum on every axis except the direction of travel.
///
/// With an impulse pending, the velocity is reduced to its component along
/// the normalized horizontal movement direction, which in particular zeroes
/// the vertical component so the upcoming impulse always launches from the
/// same vertical state. With no direction to preserve, only the vertical
/// component is dropped. Without a pending impulse the velocity is zeroed
/// outright.
pub(crate) fn reset_momentum(velocity: Vec3, movement_direction: Vec3, instant_pending: bool) -> Vec3 {
    if !instant_pending {
        return Vec3::ZERO;
    }
    let horizontal = Vec3::new(movement_direction.x, 0.0, movement_direction.z).normalize_or_zero();
    if horizontal == Vec3::ZERO {
        return Vec3::new(velocity.x, 0.0, velocity.z);
    }
    horizontal * velocity.dot(horizontal)
}

/// Sync the [`Grounded`] / [`Airborne`] markers from the sensors and emit
/// landing events on the airborne-to-grounded transition.
pub fn sync_state_markers(
    time: Res<Time>,
    mut commands: Commands,
    mut landings: EventWriter<LandedEvent>,
    sensors: Query<(Entity, &GroundSensor, Has<Grounded>, Has<Airborne>)>,
) {
    let now = time.elapsed_secs();
    for (entity, sensor, has_grounded, has_airborne) in &sensors {
        let grounded = sensor.is_grounded(now);
        if grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
            if has_airborne {
                landings.send(LandedEvent { entity });
            }
        } else if !grounded && has_grounded {
            commands.entity(entity).remove::<Grounded>().insert(Airborne);
        } else if !grounded && !has_airborne {
            commands.entity(entity).insert(Airborne);
        }
    }
}

/// Warn about tuning that silently degrades behavior.
///
/// None of these are fatal: a zero probe distance just means the sensor
/// always reports ungrounded, and a character without a sensor moves with
/// flat-ground slope handling. Warnings fire once, when the component is
/// added.
pub fn validate_configuration(
    sensors: Query<(Entity, &GroundSensor), Added<GroundSensor>>,
    characters: Query<Entity, (Added<Character>, Without<GroundSensor>)>,
    players: Query<(Entity, &PlayerConfig), Added<PlayerConfig>>,
) {
    for (entity, sensor) in &sensors {
        if sensor.ground_check_distance <= 0.0 {
            warn!("{entity}: ground probe distance is zero; the sensor will never report ground");
        }
        if let Some((_, filters)) = sensor.collision_groups {
            if filters == 0 {
                warn!("{entity}: ground collision filter is empty; probes will hit nothing");
            }
        }
    }

    for entity in &characters {
        warn!("{entity}: no GroundSensor configured; slope handling degrades to flat ground");
    }

    for (entity, config) in &players {
        if config.speed <= 0.0 {
            warn!("{entity}: player speed is zero; the character will not move as intended");
        }
        if config.force <= 0.0 {
            warn!("{entity}: player force is zero; the character will not move as intended");
        }
        if config.jump_force <= 0.0 {
            warn!("{entity}: jump force is zero; the character will not jump as intended");
        }
        if config.air_control_factor <= 0.0 {
            warn!("{entity}: air control factor is zero; the character cannot steer while airborne");
        }
    }
}
