//! Shared test harness: a deterministic kinematic physics backend.
//!
//! Instead of a full physics engine, the tests run against an analytic
//! world of axis-aligned platforms. Probes are resolved geometrically,
//! forces are integrated with a plain Euler step, and every impulse is
//! logged together with the velocity at the moment it was applied, so
//! tests can make exact assertions about the locomotion pipeline.

#![allow(dead_code)]

use std::f32::consts::TAU;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::Virtual;

use platformer_locomotion::prelude::*;

/// One fixed simulation step used by all tests.
pub const STEP_SECONDS: f64 = 1.0 / 60.0;

/// A rigid body stand-in integrated by the kinematic backend.
#[derive(Component, Debug, Clone)]
pub struct TestBody {
    pub velocity: Vec3,
    pub force: Vec3,
    pub mass: f32,
    pub use_gravity: bool,
}

impl Default for TestBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 1.0,
            use_gravity: true,
        }
    }
}

impl TestBody {
    pub fn without_gravity() -> Self {
        Self {
            use_gravity: false,
            ..Default::default()
        }
    }
}

/// Gravity used by the integrator.
#[derive(Resource, Debug, Clone, Copy)]
pub struct TestGravity(pub Vec3);

impl Default for TestGravity {
    fn default() -> Self {
        Self(Vec3::new(0.0, -20.0, 0.0))
    }
}

/// An axis-aligned platform with an analytic surface normal.
///
/// The surface sits at a constant height; the normal is reported by probes
/// independently, which lets tests stage slopes without modelling sloped
/// geometry.
#[derive(Debug, Clone, Copy)]
pub struct TestPlatform {
    pub min: Vec2,
    pub max: Vec2,
    pub surface_y: f32,
    pub normal: Vec3,
}

impl TestPlatform {
    pub fn flat(min: Vec2, max: Vec2, surface_y: f32) -> Self {
        Self {
            min,
            max,
            surface_y,
            normal: Vec3::Y,
        }
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal.normalize_or_zero();
        self
    }

    fn contains_xz(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.y && z <= self.max.y
    }
}

/// The analytic collision world.
#[derive(Resource, Debug, Clone, Default)]
pub struct TestTerrain {
    pub platforms: Vec<TestPlatform>,
}

impl TestTerrain {
    /// A single large floor at y = 0.
    pub fn flat_floor() -> Self {
        Self {
            platforms: vec![TestPlatform::flat(
                Vec2::splat(-100.0),
                Vec2::splat(100.0),
                0.0,
            )],
        }
    }

    /// Resolve a downward probe from `origin`.
    pub fn probe(&self, origin: Vec3, max_distance: f32) -> Option<CollisionData> {
        if max_distance <= 0.0 {
            return None;
        }
        self.platforms
            .iter()
            .filter(|platform| {
                platform.contains_xz(origin.x, origin.z)
                    && origin.y >= platform.surface_y
                    && origin.y - platform.surface_y <= max_distance
            })
            .map(|platform| {
                CollisionData::new(
                    origin.y - platform.surface_y,
                    platform.normal,
                    Vec3::new(origin.x, platform.surface_y, origin.z),
                    None,
                )
            })
            .min_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap())
    }
}

/// One applied impulse, with the velocity at the moment of application.
#[derive(Debug, Clone, Copy)]
pub struct ImpulseRecord {
    pub entity: Entity,
    pub velocity_before: Vec3,
    pub impulse: Vec3,
}

/// Log of every impulse the backend applied.
#[derive(Resource, Debug, Default)]
pub struct ImpulseLog(pub Vec<ImpulseRecord>);

/// Deterministic kinematic backend for tests.
pub struct KinematicBackend;

impl LocomotionBackend for KinematicBackend {
    fn plugin() -> impl Plugin {
        KinematicBackendPlugin
    }

    fn velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<TestBody>(entity)
            .map(|body| body.velocity)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            body.velocity = velocity;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            body.force += force;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        let record = if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            let velocity_before = body.velocity;
            let mass = body.mass;
            body.velocity += impulse / mass;
            Some(ImpulseRecord {
                entity,
                velocity_before,
                impulse,
            })
        } else {
            None
        };
        if let Some(record) = record {
            world.resource_mut::<ImpulseLog>().0.push(record);
        }
    }

    fn position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|transform| transform.translation)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_position(world: &mut World, entity: Entity, position: Vec3) {
        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.translation = position;
        }
    }
}

pub struct KinematicBackendPlugin;

impl Plugin for KinematicBackendPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TestTerrain>();
        app.init_resource::<ImpulseLog>();
        app.init_resource::<TestGravity>();

        app.add_systems(
            FixedUpdate,
            probe_terrain.in_set(LocomotionSet::Probe),
        );
        app.add_systems(
            FixedUpdate,
            integrate_bodies.after(LocomotionSet::StateSync),
        );
    }
}

/// Analytic stand-in for the backend's raycast probes.
fn probe_terrain(
    terrain: Res<TestTerrain>,
    mut sensors: Query<(&Transform, &mut GroundSensor, Option<&Character>)>,
) {
    for (transform, mut sensor, character) in &mut sensors {
        let origin = transform.translation;
        let max_distance = sensor.ground_check_distance;

        let center = terrain.probe(origin, max_distance);

        let forward = character
            .and_then(|c| c.continuous_request())
            .map(|request| request.horizontal_direction().normalize_or_zero())
            .filter(|direction| *direction != Vec3::ZERO)
            .and_then(|direction| {
                terrain.probe(origin + direction * sensor.front_foot_offset, max_distance)
            });

        let ring_hit = center.is_none()
            && sensor.ring_radius > 0.0
            && (0..sensor.ring_samples).any(|sample| {
                let angle = TAU * sample as f32 / sensor.ring_samples.max(1) as f32;
                let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * sensor.ring_radius;
                terrain.probe(origin + offset, max_distance).is_some()
            });

        sensor.record_probe(ProbeReport {
            center,
            forward,
            ring_hit,
        });
    }
}

/// Plain Euler integration with a surface clamp so falling bodies land on
/// platforms instead of tunnelling through.
fn integrate_bodies(
    time: Res<Time<Fixed>>,
    gravity: Res<TestGravity>,
    terrain: Res<TestTerrain>,
    mut bodies: Query<(&mut TestBody, &mut Transform)>,
) {
    let dt = {
        let dt = time.delta_secs();
        if dt > 0.0 {
            dt
        } else {
            STEP_SECONDS as f32
        }
    };

    for (mut body, mut transform) in &mut bodies {
        let mut acceleration = body.force / body.mass;
        if body.use_gravity {
            acceleration += gravity.0;
        }
        body.force = Vec3::ZERO;
        body.velocity = body.velocity + acceleration * dt;

        let old_y = transform.translation.y;
        let mut next = transform.translation + body.velocity * dt;

        if body.velocity.y < 0.0 {
            for platform in &terrain.platforms {
                if platform.contains_xz(next.x, next.z)
                    && old_y >= platform.surface_y
                    && next.y < platform.surface_y
                {
                    next.y = platform.surface_y;
                    body.velocity.y = 0.0;
                }
            }
        }

        transform.translation = next;
    }
}

/// Create a test app running the locomotion pipeline on the kinematic
/// backend, with virtual time paused so ticks only advance explicitly.
pub fn create_test_app(terrain: TestTerrain) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(LocomotionPlugin::<KinematicBackend>::default());
    app.insert_resource(Time::<Fixed>::from_hz(60.0));
    app.insert_resource(terrain);
    app.world_mut().resource_mut::<Time<Virtual>>().pause();
    app
}

/// Run one fixed simulation step.
pub fn tick(app: &mut App) {
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .advance_by(Duration::from_secs_f64(STEP_SECONDS));
    app.update();
    app.world_mut().run_schedule(FixedUpdate);
}

/// Run the simulation for N fixed steps.
pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        tick(app);
    }
}

/// Run N steps, draining jump events after each, and return everything
/// collected.
pub fn run_ticks_collecting_jumps(app: &mut App, ticks: usize) -> Vec<Entity> {
    let mut jumped = Vec::new();
    for _ in 0..ticks {
        tick(app);
        jumped.extend(drain_jumps(app));
    }
    jumped
}

/// Drain and return all pending jump events.
pub fn drain_jumps(app: &mut App) -> Vec<Entity> {
    app.world_mut()
        .resource_mut::<Events<JumpedEvent>>()
        .drain()
        .map(|event| event.entity)
        .collect()
}

/// Drain and return all pending landing events.
pub fn drain_landings(app: &mut App) -> Vec<Entity> {
    app.world_mut()
        .resource_mut::<Events<LandedEvent>>()
        .drain()
        .map(|event| event.entity)
        .collect()
}

/// Spawn a fully equipped player character.
pub fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    spawn_player_with(
        app,
        position,
        TestBody::default(),
        GroundSensor::new(),
        PlayerConfig::default(),
    )
}

/// Spawn a player with custom body, sensor and policy tuning.
pub fn spawn_player_with(
    app: &mut App,
    position: Vec3,
    body: TestBody,
    sensor: GroundSensor,
    config: PlayerConfig,
) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            body,
            Character::new(),
            CharacterConfig::default(),
            sensor,
            config,
            PlayerController::new(),
            PlayerInput::default(),
        ))
        .id()
}

pub fn body(app: &App, entity: Entity) -> &TestBody {
    app.world().get::<TestBody>(entity).unwrap()
}

pub fn translation(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).unwrap().translation
}

pub fn character(app: &App, entity: Entity) -> &Character {
    app.world().get::<Character>(entity).unwrap()
}

pub fn sensor(app: &App, entity: Entity) -> &GroundSensor {
    app.world().get::<GroundSensor>(entity).unwrap()
}

pub fn move_input(app: &mut App, entity: Entity, input: Vec2) {
    app.world_mut()
        .get_mut::<PlayerInput>(entity)
        .unwrap()
        .on_move(input);
}

pub fn press_jump(app: &mut App, entity: Entity) {
    app.world_mut()
        .get_mut::<PlayerInput>(entity)
        .unwrap()
        .on_jump_pressed();
}

pub fn release_jump(app: &mut App, entity: Entity) {
    app.world_mut()
        .get_mut::<PlayerInput>(entity)
        .unwrap()
        .on_jump_released();
}
