//! Obstacle pools: a fixed, ordered set of slot entities spawned up front.
//!
//! Slots are never spawned or despawned during play. Activation and return only rewrite
//! component values, so nothing moves between archetypes:
//! - Inactive: hidden, zero velocity, collision filters empty (collides with nothing)
//! - Active: visible, moving, collides with the world bounds and the character

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;

#[derive(Component, Debug, Clone, Default)]
pub struct ObstaclePool {
    pub slots: Vec<Entity>,
}

impl ObstaclePool {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct PooledObstacle;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Inactive,
    Active,
    /// Touched a bound this step; the commit system deactivates it.
    PendingReturn,
}

#[inline]
pub fn active_obstacle_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Obstacle, [Layer::World, Layer::Character])
}

#[inline]
pub fn inactive_obstacle_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Obstacle, [] as [Layer; 0])
}

/// Spawn `size` inactive slots plus the pool entity that orders them.
pub fn spawn_pool(commands: &mut Commands, name: &str, size: usize, obstacle_size: Vec2) -> Entity {
    let slots = (0..size)
        .map(|i| {
            commands
                .spawn((
                    Name::new(format!("{name}/Slot{i}")),
                    PooledObstacle,
                    SlotState::Inactive,
                    Sprite {
                        color: Color::srgb(0.85, 0.35, 0.2),
                        custom_size: Some(obstacle_size),
                        ..default()
                    },
                    Transform::default(),
                    Visibility::Hidden,
                    RigidBody::Dynamic,
                    Collider::rectangle(obstacle_size.x, obstacle_size.y),
                    inactive_obstacle_layers(),
                    LinearVelocity::ZERO,
                    CollisionEventsEnabled,
                    DespawnOnExit(GameState::InGame),
                ))
                .id()
        })
        .collect();

    commands
        .spawn((
            Name::new(name.to_owned()),
            ObstaclePool { slots },
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

/// Deactivate slots marked `PendingReturn`. This is the only writer of the inactive values.
pub fn return_to_pool_commit(
    mut q: Query<
        (
            &mut SlotState,
            &mut Visibility,
            &mut LinearVelocity,
            &mut CollisionLayers,
        ),
        With<PooledObstacle>,
    >,
) {
    for (mut state, mut vis, mut vel, mut layers) in &mut q {
        if *state != SlotState::PendingReturn {
            continue;
        }

        *state = SlotState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
        *layers = inactive_obstacle_layers();
    }
}
