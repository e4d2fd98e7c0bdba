//! Obstacles plugin: pooled obstacles recycled round-robin by per-level spawners.
//!
//! ```text
//! OnEnter(InGame)
//!   Build:     build_obstacles   pools + spawners from LevelConfig
//!   Validate:  validate_spawners pool references checked, faults reported
//! LevelLaunched (observer): start_spawners   Idle -> Running
//! Update:          tick_spawners                 activate slot at cursor every period
//! FixedPostUpdate: resolve_obstacle_collisions   hits / PendingReturn
//!                  return_to_pool_commit         PendingReturn -> Inactive
//! ```
//!
//! Each pool is driven by exactly one spawner. Spawners never create or destroy slots.

pub mod collision;
pub mod cursor;
pub mod pool;
pub mod spawner;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::config::LevelConfig;
use crate::common::state::GameState;
use crate::plugins::level::LevelBoot;

pub use cursor::SpawnCursor;
pub use pool::{ObstaclePool, PooledObstacle, SlotState};
pub use spawner::{PoolSpawner, SpawnSound, SpawnerError, SpawnerFault, SpawnerPhase};

pub fn plugin(app: &mut App) {
    app.add_message::<SpawnerFault>()
        .add_observer(spawner::start_spawners)
        .add_systems(
            OnEnter(GameState::InGame),
            (
                build_obstacles.in_set(LevelBoot::Build),
                spawner::validate_spawners.in_set(LevelBoot::Validate),
            ),
        )
        .add_systems(
            Update,
            spawner::tick_spawners.run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            (
                collision::resolve_obstacle_collisions.after(CollisionEventSystems),
                pool::return_to_pool_commit.after(collision::resolve_obstacle_collisions),
            )
                .run_if(in_state(GameState::InGame)),
        );
}

fn build_obstacles(
    mut commands: Commands,
    config: Res<LevelConfig>,
    assets: Option<Res<AssetServer>>,
) {
    for (i, def) in config.spawners.iter().enumerate() {
        let spawner = match PoolSpawner::new(def.period_secs, None) {
            Ok(spawner) => spawner.with_launch_velocity(Vec2::from_array(def.launch_velocity)),
            Err(err) => {
                error!("Spawner #{i} skipped: {err}");
                continue;
            }
        };

        let pool_entity = pool::spawn_pool(
            &mut commands,
            &format!("ObstaclePool{i}"),
            def.pool_size,
            Vec2::from_array(def.obstacle_size),
        );

        let placement = Transform::from_translation(Vec2::from_array(def.position).extend(2.0))
            .with_rotation(Quat::from_rotation_z(def.rotation_deg.to_radians()));

        let mut entity = commands.spawn((
            Name::new(format!("Spawner{i}")),
            spawner.with_pool(pool_entity),
            placement,
            DespawnOnExit(GameState::InGame),
        ));
        if let (Some(path), Some(assets)) = (def.sound.as_ref(), assets.as_ref()) {
            entity.insert(SpawnSound(assets.load(path.clone())));
        }
    }
}
