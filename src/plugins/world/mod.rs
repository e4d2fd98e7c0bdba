//! World plugin: the ground and the walls around the play area. Obstacles that touch them
//! go back to their pool.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::plugins::level::LevelBoot;

const HALF_W: f32 = 800.0;
const HALF_H: f32 = 450.0;
const THICKNESS: f32 = 30.0;

pub fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(GameState::InGame),
        spawn_bounds.in_set(LevelBoot::Build),
    );
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Bound;

fn spawn_bounds(mut commands: Commands) {
    let layers = CollisionLayers::new(Layer::World, [Layer::Character, Layer::Obstacle]);
    let full_w = HALF_W * 2.0 + THICKNESS * 2.0;

    let mut spawn_bound = |name: &str, pos: Vec2, size: Vec2, color: Color| {
        commands.spawn((
            Name::new(name.to_owned()),
            Bound,
            Sprite::from_color(color, size),
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            layers,
            DespawnOnExit(GameState::InGame),
        ));
    };

    let ground = Color::srgb(0.22, 0.2, 0.18);
    let edge = Color::srgb(0.1, 0.1, 0.12);

    spawn_bound(
        "BoundGround",
        Vec2::new(0.0, -HALF_H - THICKNESS * 0.5),
        Vec2::new(full_w, THICKNESS),
        ground,
    );
    spawn_bound(
        "BoundTop",
        Vec2::new(0.0, HALF_H + THICKNESS * 0.5),
        Vec2::new(full_w, THICKNESS),
        edge,
    );
    spawn_bound(
        "BoundLeft",
        Vec2::new(-HALF_W - THICKNESS * 0.5, 0.0),
        Vec2::new(THICKNESS, HALF_H * 2.0),
        edge,
    );
    spawn_bound(
        "BoundRight",
        Vec2::new(HALF_W + THICKNESS * 0.5, 0.0),
        Vec2::new(THICKNESS, HALF_H * 2.0),
        edge,
    );
}
