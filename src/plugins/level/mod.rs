//! Level lifecycle: the current [`LevelMode`], the one-shot launch broadcast, and the boot
//! sequence that picks between training and a direct launch.
//!
//! ```text
//! OnEnter(InGame)
//!   LevelBoot::Build     prepare_level, world/character/obstacles/checkpoints spawn
//!   LevelBoot::Validate  spawner configuration is checked
//!   LevelBoot::Start     start_level ── training pending? ──> Training ─(timer)─┐
//!                                    └────────────────────> launch <──────────┘
//! launch: mode = Play ─> trigger LevelLaunched (observers) ─> music on if sound enabled
//! Update: LevelFinished messages ─> Completed / Losing via the transition table
//! ```
//!
//! The `Level` resource is the level-context handle: systems read it as `Res<Level>`
//! rather than reaching for a global. Each `App` owns an independent level.

pub mod mode;

use bevy::prelude::*;
use bevy::time::Stopwatch;

use crate::common::config::LevelConfig;
use crate::common::prefs::{Preferences, TRAINING_KEY};
use crate::common::state::GameState;
use crate::plugins::character::CharacterController;
use crate::plugins::obstacles::SpawnerFault;
use crate::plugins::sound::{self, BackgroundMusic, MusicState};

pub use mode::{IllegalTransition, LevelMode, ModeParseError};

/// Stars a run starts with.
pub const FULL_STARS: u32 = 3;

/// Mode plus the per-run counters read by the results screen.
#[derive(Resource, Debug, Clone)]
pub struct Level {
    mode: LevelMode,
    number: u32,
    coins: u32,
    stars: u32,
    brains: u32,
}

impl Default for Level {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Level {
    pub fn new(number: u32) -> Self {
        Self {
            mode: LevelMode::Start,
            number,
            coins: 0,
            stars: FULL_STARS,
            brains: 0,
        }
    }

    pub fn with_brains(mut self, brains: u32) -> Self {
        self.brains = brains;
        self
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    /// Drop one star; never goes below zero.
    pub fn lose_star(&mut self) {
        self.stars = self.stars.saturating_sub(1);
    }

    pub fn brains(&self) -> u32 {
        self.brains
    }

    pub fn mode(&self) -> LevelMode {
        self.mode
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn is_playing(&self) -> bool {
        self.mode == LevelMode::Play
    }

    /// Overwrite the mode. No validation, no notification.
    pub fn set_mode(&mut self, mode: LevelMode) {
        self.mode = mode;
    }

    /// Move to `to` only if the transition table allows it. Returns the previous mode.
    pub fn try_set_mode(&mut self, to: LevelMode) -> Result<LevelMode, IllegalTransition> {
        let from = self.mode;
        if !from.can_transition_to(to) {
            return Err(IllegalTransition { from, to });
        }
        self.mode = to;
        Ok(from)
    }
}

/// Broadcast when the level enters active play. Observers run synchronously inside
/// [`launch`], in no particular order.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct LevelLaunched;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Completed,
    Lost,
}

impl LevelOutcome {
    pub fn mode(self) -> LevelMode {
        match self {
            LevelOutcome::Completed => LevelMode::Completed,
            LevelOutcome::Lost => LevelMode::Losing,
        }
    }
}

/// Request to end the level; written by finish zones, results logic and similar producers.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFinished {
    pub outcome: LevelOutcome,
}

/// Play time of the current run. Advances only in `Play`.
#[derive(Resource, Debug, Default)]
pub struct LevelClock(pub Stopwatch);

#[derive(Resource, Debug)]
pub struct TrainingSequence {
    pub timer: Timer,
}

impl TrainingSequence {
    pub fn new(secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(secs.max(0.0), TimerMode::Once),
        }
    }
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelBoot {
    Build,
    Validate,
    Start,
}

/// Run condition: the level is currently in `mode`.
pub fn level_in(mode: LevelMode) -> impl FnMut(Option<Res<Level>>) -> bool + Clone {
    move |level: Option<Res<Level>>| level.is_some_and(|level| level.mode() == mode)
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Level>()
        .init_resource::<LevelClock>()
        .add_message::<LevelFinished>()
        .configure_sets(
            OnEnter(GameState::InGame),
            (LevelBoot::Build, LevelBoot::Validate, LevelBoot::Start).chain(),
        )
        .add_systems(
            OnEnter(GameState::InGame),
            (
                prepare_level.in_set(LevelBoot::Build),
                start_level.in_set(LevelBoot::Start),
            ),
        )
        .add_systems(
            Update,
            (
                advance_training.run_if(level_in(LevelMode::Training)),
                tick_level_clock.run_if(level_in(LevelMode::Play)),
                apply_level_outcomes,
                report_spawner_faults,
            )
                .run_if(in_state(GameState::InGame)),
        );
}

fn prepare_level(
    config: Res<LevelConfig>,
    mut level: ResMut<Level>,
    mut clock: ResMut<LevelClock>,
) {
    *level = Level::new(config.level_number).with_brains(config.brains);
    clock.0.reset();
}

/// Enter active play and notify every `LevelLaunched` observer.
///
/// Calling it again while already in `Play` broadcasts again. Background music starts
/// when the sound preference allows it.
pub fn launch(world: &mut World) {
    let Some(mut level) = world.get_resource_mut::<Level>() else {
        error!("launch called without a Level resource");
        return;
    };
    level.set_mode(LevelMode::Play);
    let number = level.number();
    info!("Level {number} launched");

    world.trigger(LevelLaunched);
    world.flush();

    let sound_on = world
        .get_resource::<Preferences>()
        .is_none_or(sound::playing_sounds);
    if sound_on {
        if let Some(mut music) = world.get_resource_mut::<BackgroundMusic>() {
            music.switch(MusicState::On);
        }
    }
}

/// Boot the level: run training if it is configured and still pending, otherwise launch.
pub fn start_level(world: &mut World) {
    let training_secs = world
        .get_resource::<LevelConfig>()
        .and_then(|config| config.training_secs);
    let training_pending = world
        .get_resource::<Preferences>()
        .is_some_and(|prefs| prefs.get_int(TRAINING_KEY) == 0);

    let Some(secs) = training_secs.filter(|_| training_pending) else {
        launch(world);
        return;
    };

    if let Some(mut level) = world.get_resource_mut::<Level>() {
        level.set_mode(LevelMode::Training);
    }
    let mut controllers = world.query::<&mut CharacterController>();
    for mut controller in controllers.iter_mut(world) {
        controller.enabled = false;
    }
    world.insert_resource(TrainingSequence::new(secs));
    info!("Training started ({secs:.1}s)");
}

fn advance_training(
    mut commands: Commands,
    time: Res<Time>,
    training: Option<ResMut<TrainingSequence>>,
    mut prefs: ResMut<Preferences>,
) {
    let Some(mut training) = training else {
        return;
    };
    training.timer.tick(time.delta());
    if !training.timer.is_finished() {
        return;
    }

    prefs.set_int(TRAINING_KEY, 1);
    commands.remove_resource::<TrainingSequence>();
    info!("Training finished");
    commands.queue(launch);
}

fn tick_level_clock(time: Res<Time>, mut clock: ResMut<LevelClock>) {
    clock.0.tick(time.delta());
}

fn apply_level_outcomes(mut finished: MessageReader<LevelFinished>, mut level: ResMut<Level>) {
    for msg in finished.read() {
        match level.try_set_mode(msg.outcome.mode()) {
            Ok(from) => info!("Level {} {from} -> {}", level.number(), level.mode()),
            Err(err) => warn!("Ignoring {:?}: {err}", msg.outcome),
        }
    }
}

/// Spawner faults stop only the faulty spawner; the level keeps running and logs them.
fn report_spawner_faults(level: Res<Level>, mut faults: MessageReader<SpawnerFault>) {
    for fault in faults.read() {
        error!(
            "Level {}: spawner {} stopped: {}",
            level.number(),
            fault.spawner,
            fault.error
        );
    }
}
