//! Pool spawner: while the level is in `Play`, activate the next pooled slot every period
//! at the spawner's current placement.
//!
//! Lifecycle per spawner instance:
//! ```text
//! Idle ──LevelLaunched──> Running ──mode != Play──> Stopped
//!   │                        │
//!   └── bad pool ref ──> Failed <── slot missing ──┘
//! ```
//! `Stopped` and `Failed` are final for the instance; a level reset rebuilds spawners.
//! The mode is checked every time the spawner wakes, before anything is activated, so a
//! spawner that has seen the level leave `Play` never activates another slot.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::plugins::level::{Level, LevelLaunched};
use crate::plugins::sound::PlaySound;

use super::cursor::SpawnCursor;
use super::pool::{active_obstacle_layers, ObstaclePool, PooledObstacle, SlotState};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpawnerError {
    #[error("spawner has no pool assigned")]
    PoolUnset,
    #[error("pool entity {0} has no ObstaclePool")]
    PoolMissing(Entity),
    #[error("slot {slot} of pool {pool} is not a pooled obstacle")]
    SlotMissing { pool: Entity, slot: Entity },
    #[error("spawn period must be positive, got {0}")]
    InvalidPeriod(f32),
}

/// Diagnostic for the level owner: a spawner stopped because of a configuration fault.
#[derive(Message, Debug, Clone)]
pub struct SpawnerFault {
    pub spawner: Entity,
    pub error: SpawnerError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnerPhase {
    #[default]
    Idle,
    Running,
    Stopped,
    Failed,
}

/// One-shot clip played on each activation.
#[derive(Component, Debug, Clone)]
pub struct SpawnSound(pub Handle<AudioSource>);

#[derive(Component, Debug, Clone)]
pub struct PoolSpawner {
    pool: Option<Entity>,
    launch_velocity: Vec2,
    timer: Timer,
    cursor: SpawnCursor,
    phase: SpawnerPhase,
}

impl PoolSpawner {
    pub fn new(period_secs: f32, pool: Option<Entity>) -> Result<Self, SpawnerError> {
        if !(period_secs > 0.0 && period_secs.is_finite()) {
            return Err(SpawnerError::InvalidPeriod(period_secs));
        }
        Ok(Self {
            pool,
            launch_velocity: Vec2::ZERO,
            timer: Timer::from_seconds(period_secs, TimerMode::Repeating),
            cursor: SpawnCursor::default(),
            phase: SpawnerPhase::Idle,
        })
    }

    pub fn with_pool(mut self, pool: Entity) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Velocity given to activated slots, in the spawner's local frame.
    pub fn with_launch_velocity(mut self, velocity: Vec2) -> Self {
        self.launch_velocity = velocity;
        self
    }

    pub fn period(&self) -> Duration {
        self.timer.duration()
    }

    pub fn pool(&self) -> Option<Entity> {
        self.pool
    }

    pub fn phase(&self) -> SpawnerPhase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    fn resolve_pool<'a>(
        &self,
        pools: &'a Query<&ObstaclePool>,
    ) -> Result<(Entity, &'a ObstaclePool), SpawnerError> {
        let pool = self.pool.ok_or(SpawnerError::PoolUnset)?;
        let slots = pools.get(pool).map_err(|_| SpawnerError::PoolMissing(pool))?;
        Ok((pool, slots))
    }

    fn fail(&mut self, spawner: Entity, error: SpawnerError, faults: &mut MessageWriter<SpawnerFault>) {
        self.phase = SpawnerPhase::Failed;
        faults.write(SpawnerFault { spawner, error });
    }
}

type SlotItems = (
    &'static mut SlotState,
    &'static mut Transform,
    &'static mut Visibility,
    &'static mut CollisionLayers,
    &'static mut LinearVelocity,
);
type SlotFilter = (With<PooledObstacle>, Without<PoolSpawner>);

/// `LevelLaunched` observer: start every idle spawner whose pool reference is valid.
pub fn start_spawners(
    _launched: On<LevelLaunched>,
    mut spawners: Query<(Entity, &mut PoolSpawner)>,
    pools: Query<&ObstaclePool>,
    mut faults: MessageWriter<SpawnerFault>,
) {
    for (e, mut spawner) in &mut spawners {
        match spawner.phase {
            SpawnerPhase::Idle => {}
            SpawnerPhase::Running => {
                debug!("Spawner {e} already running; launch ignored");
                continue;
            }
            SpawnerPhase::Stopped | SpawnerPhase::Failed => continue,
        }

        match spawner.resolve_pool(&pools) {
            Ok(_) => {
                spawner.timer.reset();
                spawner.phase = SpawnerPhase::Running;
            }
            Err(error) => spawner.fail(e, error, &mut faults),
        }
    }
}

/// Level-load check so misconfigured spawners are reported before play starts.
pub fn validate_spawners(
    mut spawners: Query<(Entity, &mut PoolSpawner)>,
    pools: Query<&ObstaclePool>,
    mut faults: MessageWriter<SpawnerFault>,
) {
    for (e, mut spawner) in &mut spawners {
        if spawner.phase != SpawnerPhase::Idle {
            continue;
        }
        match spawner.resolve_pool(&pools) {
            Ok((_, pool)) if pool.is_empty() => debug!("Spawner {e} has an empty pool"),
            Ok(_) => {}
            Err(error) => spawner.fail(e, error, &mut faults),
        }
    }
}

pub fn tick_spawners(
    time: Res<Time>,
    level: Res<Level>,
    mut spawners: Query<(Entity, &mut PoolSpawner, &Transform, Option<&SpawnSound>)>,
    pools: Query<&ObstaclePool>,
    mut slots: Query<SlotItems, SlotFilter>,
    mut sounds: MessageWriter<PlaySound>,
    mut faults: MessageWriter<SpawnerFault>,
) {
    for (e, mut spawner, placement, sound) in &mut spawners {
        if spawner.phase != SpawnerPhase::Running {
            continue;
        }
        if !level.is_playing() {
            spawner.phase = SpawnerPhase::Stopped;
            debug!("Spawner {e} stopped: level is {}", level.mode());
            continue;
        }

        spawner.timer.tick(time.delta());
        for _ in 0..spawner.timer.times_finished_this_tick() {
            match activate_next(&mut spawner, &pools, &mut slots, placement) {
                Ok(true) => {
                    if let Some(SpawnSound(clip)) = sound {
                        sounds.write(PlaySound { clip: clip.clone() });
                    }
                }
                Ok(false) => {}
                Err(error) => {
                    spawner.fail(e, error, &mut faults);
                    break;
                }
            }
        }
    }
}

/// Activate the slot under the cursor. `Ok(false)` means the pool is empty.
fn activate_next(
    spawner: &mut PoolSpawner,
    pools: &Query<&ObstaclePool>,
    slots: &mut Query<SlotItems, SlotFilter>,
    placement: &Transform,
) -> Result<bool, SpawnerError> {
    let (pool_entity, pool) = spawner.resolve_pool(pools)?;
    let Some(index) = spawner.cursor.take(pool.len()) else {
        return Ok(false);
    };
    let slot = pool.slots[index];

    let (mut state, mut tf, mut vis, mut layers, mut vel) = slots
        .get_mut(slot)
        .map_err(|_| SpawnerError::SlotMissing { pool: pool_entity, slot })?;

    *state = SlotState::Active;
    tf.translation = placement.translation;
    tf.rotation = placement.rotation;
    *vis = Visibility::Visible;
    *layers = active_obstacle_layers();
    vel.0 = (placement.rotation * spawner.launch_velocity.extend(0.0)).truncate();

    Ok(true)
}
