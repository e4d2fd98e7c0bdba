//! Character plugin: spawn the selected character, drive it, knock it down on obstacle hits
//! and revive it at the last checkpoint.
//!
//! Pipeline:
//! - OnEnter(InGame): read the selection + stats blob from preferences, spawn the body
//! - Update: sample input, consume `CharacterHit`, revive after the respawn delay
//! - FixedUpdate: drive the body's velocity from input
//!
//! `CharacterLife` follows the same explicit-state approach as the other lifecycles in
//! this crate: `Alive` or `Down` with its own revive timer, never a pair of flags.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use serde::Deserialize;

use crate::common::config::LevelConfig;
use crate::common::layers::Layer;
use crate::common::prefs::{CHARACTER_KEY, Preferences, character_stats_key};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::level::{Level, LevelBoot, LevelLaunched};

#[derive(Component, Debug, Clone, Copy)]
pub struct Character {
    /// 1-based roster index, as stored in preferences.
    pub index: i32,
}

#[derive(Component, Debug, Clone)]
pub enum CharacterLife {
    Alive,
    Down { timer: Timer },
}

impl CharacterLife {
    pub fn is_alive(&self) -> bool {
        matches!(self, CharacterLife::Alive)
    }
}

#[derive(Component, Debug, Clone)]
pub struct CharacterController {
    pub enabled: bool,
    /// Where the character reappears after being knocked down.
    pub respawn_position: Vec3,
}

impl CharacterController {
    pub fn new(respawn_position: Vec3) -> Self {
        Self {
            enabled: true,
            respawn_position,
        }
    }
}

/// Per-character progression, stored as JSON under `character-<index>`.
#[derive(Component, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    pub speed: f32,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl CharacterStats {
    pub fn from_prefs(prefs: &Preferences, index: i32) -> Self {
        let blob = prefs.get_string(&character_stats_key(index));
        if blob.is_empty() {
            return Self::default();
        }
        serde_json::from_str(blob).unwrap_or_else(|err| {
            warn!("Character {index} stats unreadable, using defaults: {err}");
            Self::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct CharacterDef {
    pub name: String,
    pub color: Color,
    pub size: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct CharacterRoster(pub Vec<CharacterDef>);

impl Default for CharacterRoster {
    fn default() -> Self {
        let def = |name: &str, color, size| CharacterDef {
            name: name.into(),
            color,
            size,
        };
        Self(vec![
            def("Runner", Color::srgb(0.45, 0.8, 0.35), 26.0),
            def("Brute", Color::srgb(0.55, 0.6, 0.3), 32.0),
            def("Sprinter", Color::srgb(0.35, 0.75, 0.6), 22.0),
        ])
    }
}

impl CharacterRoster {
    /// Resolve the stored 1-based selection, falling back to the first entry.
    pub fn selected(&self, prefs: &Preferences) -> Option<(i32, &CharacterDef)> {
        let stored = prefs.get_int(CHARACTER_KEY);
        let index = match usize::try_from(stored) {
            Ok(i) if (1..=self.0.len()).contains(&i) => stored,
            _ => {
                if prefs.contains(CHARACTER_KEY) {
                    warn!("Selected character {stored} is not in the roster, using the first");
                }
                1
            }
        };
        let def = self.0.get(usize::try_from(index - 1).ok()?)?;
        Some((index, def))
    }
}

/// An obstacle struck this character.
#[derive(Message, Debug, Clone, Copy)]
pub struct CharacterHit {
    pub character: Entity,
}

#[derive(Resource, Default, Debug)]
struct MoveInput {
    axis: Vec2,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<CharacterRoster>()
        .init_resource::<MoveInput>()
        .add_message::<CharacterHit>()
        .add_observer(enable_controls_on_launch)
        .add_systems(
            OnEnter(GameState::InGame),
            spawn_character.in_set(LevelBoot::Build),
        )
        .add_systems(
            Update,
            (
                gather_input,
                knock_down_on_hit,
                revive_characters.after(knock_down_on_hit),
            )
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(FixedUpdate, apply_movement);
}

fn spawn_character(
    mut commands: Commands,
    config: Res<LevelConfig>,
    prefs: Res<Preferences>,
    roster: Res<CharacterRoster>,
) {
    let Some((index, def)) = roster.selected(&prefs) else {
        error!("Character roster is empty; no character spawned");
        return;
    };
    let stats = CharacterStats::from_prefs(&prefs, index);
    let start = Vec2::from_array(config.start_position).extend(1.0);

    let layers = CollisionLayers::new(
        Layer::Character,
        [Layer::World, Layer::Obstacle, Layer::Checkpoint],
    );

    commands.spawn((
        Name::new(def.name.clone()),
        Character { index },
        CharacterLife::Alive,
        CharacterController::new(start),
        stats,
        Sprite {
            color: def.color,
            custom_size: Some(Vec2::splat(def.size)),
            ..default()
        },
        Transform::from_translation(start),
        RigidBody::Dynamic,
        LockedAxes::ROTATION_LOCKED,
        Collider::rectangle(def.size, def.size),
        layers,
        LinearVelocity::ZERO,
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    ));
    info!("Spawned character {index} ({})", def.name);
}

fn enable_controls_on_launch(
    _launched: On<LevelLaunched>,
    mut q: Query<(&mut CharacterController, &CharacterLife)>,
) {
    for (mut controller, life) in &mut q {
        controller.enabled = life.is_alive();
    }
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<MoveInput>) {
    let Some(keys) = keys else {
        return;
    };
    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.axis = axis.normalize_or_zero();
}

fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<MoveInput>,
    mut q: Query<(
        &CharacterController,
        &CharacterLife,
        &CharacterStats,
        &mut LinearVelocity,
    )>,
) {
    for (controller, life, stats, mut vel) in &mut q {
        vel.0 = if controller.enabled && life.is_alive() {
            input.axis * tunables.character_speed * stats.speed
        } else {
            Vec2::ZERO
        };
    }
}

fn knock_down_on_hit(
    tunables: Res<Tunables>,
    mut hits: MessageReader<CharacterHit>,
    mut q: Query<(&mut CharacterLife, &mut CharacterController, &mut LinearVelocity)>,
) {
    for hit in hits.read() {
        let Ok((mut life, mut controller, mut vel)) = q.get_mut(hit.character) else {
            continue;
        };
        if !life.is_alive() {
            continue;
        }
        *life = CharacterLife::Down {
            timer: Timer::from_seconds(tunables.respawn_delay, TimerMode::Once),
        };
        controller.enabled = false;
        vel.0 = Vec2::ZERO;
        debug!("Character {} knocked down", hit.character);
    }
}

fn revive_characters(
    time: Res<Time>,
    level: Res<Level>,
    mut q: Query<(
        &mut CharacterLife,
        &mut CharacterController,
        &mut Transform,
        &mut LinearVelocity,
    )>,
) {
    for (mut life, mut controller, mut tf, mut vel) in &mut q {
        let CharacterLife::Down { timer } = &mut *life else {
            continue;
        };
        timer.tick(time.delta());
        if !timer.is_finished() {
            continue;
        }

        tf.translation = controller.respawn_position;
        tf.rotation = Quat::IDENTITY;
        vel.0 = Vec2::ZERO;
        controller.enabled = level.is_playing();
        *life = CharacterLife::Alive;
    }
}
