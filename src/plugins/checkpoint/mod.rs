//! Respawn checkpoints: touching one moves the character's respawn point onto it.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::config::LevelConfig;
use crate::common::layers::Layer;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::character::{CharacterController, CharacterLife};
use crate::plugins::level::LevelBoot;

#[derive(Component, Debug, Clone, Copy)]
pub struct Checkpoint;

pub fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(GameState::InGame),
        spawn_checkpoints.in_set(LevelBoot::Build),
    )
    .add_systems(
        FixedPostUpdate,
        record_respawn_points
            .after(CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );
}

fn spawn_checkpoints(mut commands: Commands, config: Res<LevelConfig>) {
    for (i, pos) in config.checkpoints.iter().enumerate() {
        commands.spawn((
            Name::new(format!("Checkpoint{i}")),
            Checkpoint,
            Sprite {
                color: Color::srgba(0.4, 0.6, 1.0, 0.5),
                custom_size: Some(Vec2::new(12.0, 48.0)),
                ..default()
            },
            Transform::from_translation(Vec2::from_array(*pos).extend(0.5)),
            RigidBody::Static,
            Collider::rectangle(12.0, 48.0),
            Sensor,
            CollisionLayers::new(Layer::Checkpoint, [Layer::Character]),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// A living character touching a checkpoint will respawn one metre above it.
fn record_respawn_points(
    tunables: Res<Tunables>,
    mut started: MessageReader<CollisionStart>,
    q_checkpoints: Query<&Transform, With<Checkpoint>>,
    mut q_characters: Query<(&CharacterLife, &mut CharacterController)>,
) {
    for ev in started.read() {
        let (checkpoint, character) = if q_checkpoints.contains(ev.collider1) {
            (ev.collider1, ev.body2.unwrap_or(ev.collider2))
        } else if q_checkpoints.contains(ev.collider2) {
            (ev.collider2, ev.body1.unwrap_or(ev.collider1))
        } else {
            continue;
        };

        let Ok(tf) = q_checkpoints.get(checkpoint) else {
            continue;
        };
        let Ok((life, mut controller)) = q_characters.get_mut(character) else {
            continue;
        };
        if !life.is_alive() {
            continue;
        }

        controller.respawn_position = tf.translation + Vec3::Y * tunables.pixels_per_meter;
        debug!("Respawn point set to {}", controller.respawn_position);
    }
}

#[cfg(test)]
mod tests;
