//! Camera plugin: snap to the living character, let go while it is down.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera (render-only)
//! Update:          snap_camera_to_target  CharacterLife changed -> MainCamera.follow
//! PostUpdate:      follow_target          ease toward the followed entity
//! ```
//!
//! The followed entity is stored on the camera itself, so the follow system does one
//! `get` instead of scanning for the character each frame.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::character::{Character, CharacterLife};

#[derive(Component, Debug, Default)]
pub struct MainCamera {
    pub follow: Option<Entity>,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            Update,
            snap_camera_to_target.run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            PostUpdate,
            follow_target
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

/// Follow the character while it is alive; stop following when it goes down.
pub fn snap_camera_to_target(
    q_character: Query<(Entity, &CharacterLife), (With<Character>, Changed<CharacterLife>)>,
    mut q_cam: Query<&mut MainCamera>,
) {
    for (character, life) in &q_character {
        let follow = life.is_alive().then_some(character);
        for mut cam in &mut q_cam {
            cam.follow = follow;
        }
    }
}

fn follow_target(
    time: Res<Time>,
    tunables: Res<Tunables>,
    // Disjointness proof: the target is never the camera itself.
    q_target: Query<&Transform, Without<MainCamera>>,
    mut q_cam: Query<(&mut Transform, &MainCamera)>,
) {
    let alpha = 1.0 - (-tunables.camera_responsiveness * time.delta_secs()).exp();

    for (mut tf_cam, cam) in &mut q_cam {
        let Some(target) = cam.follow else {
            continue;
        };
        let Ok(tf_target) = q_target.get(target) else {
            continue;
        };
        let delta = (tf_target.translation - tf_cam.translation).truncate() * alpha;
        tf_cam.translation += delta.extend(0.0);
    }
}
