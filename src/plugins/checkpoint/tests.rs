use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::config::LevelConfig;
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::plugins::character::{CharacterController, CharacterLife};

use super::*;

fn touch(world: &mut World, a: Entity, b: Entity) {
    world.write_message(CollisionStart {
        collider1: a,
        collider2: b,
        body1: None,
        body2: None,
    });
}

fn checkpoint_world() -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.init_resource::<Messages<CollisionStart>>();
    let checkpoint = world
        .spawn((Checkpoint, Transform::from_xyz(200.0, 10.0, 0.5)))
        .id();
    (world, checkpoint)
}

#[test]
fn spawns_one_sensor_per_configured_checkpoint() {
    let mut world = World::new();
    world.insert_resource(LevelConfig {
        checkpoints: vec![[0.0, 0.0], [300.0, 0.0]],
        ..default()
    });

    run_system_once(&mut world, spawn_checkpoints);

    let sensors = world
        .query_filtered::<(), (With<Checkpoint>, With<Sensor>)>()
        .iter(&world)
        .count();
    assert_eq!(sensors, 2);
}

#[test]
fn living_character_records_position_above_checkpoint() {
    let (mut world, checkpoint) = checkpoint_world();
    let character = world
        .spawn((CharacterLife::Alive, CharacterController::new(Vec3::ZERO)))
        .id();

    touch(&mut world, character, checkpoint);
    run_system_once(&mut world, record_respawn_points);

    let ppm = Tunables::default().pixels_per_meter;
    assert_eq!(
        world.get::<CharacterController>(character).unwrap().respawn_position,
        Vec3::new(200.0, 10.0 + ppm, 0.5)
    );
}

#[test]
fn downed_character_keeps_old_respawn_point() {
    let (mut world, checkpoint) = checkpoint_world();
    let character = world
        .spawn((
            CharacterLife::Down {
                timer: Timer::from_seconds(1.0, TimerMode::Once),
            },
            CharacterController::new(Vec3::new(1.0, 2.0, 1.0)),
        ))
        .id();

    touch(&mut world, checkpoint, character);
    run_system_once(&mut world, record_respawn_points);

    assert_eq!(
        world.get::<CharacterController>(character).unwrap().respawn_position,
        Vec3::new(1.0, 2.0, 1.0)
    );
}
