//! Game composition root.
//!
//! - `configure_full`: DefaultPlugins (window/render/audio) + persisted settings + game plugins.
//! - `configure_headless`: gameplay only, for integration tests.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::config::LevelConfig;
use crate::common::prefs::Preferences;
use crate::common::state::GameState;
use crate::plugins;

const PREFS_PATH: &str = "prefs.json";
const LEVEL_PATH: &str = "assets/level.json";

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Obstacle Run".into(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    }));

    app.insert_resource(Preferences::load_or_default(PREFS_PATH))
        .insert_resource(LevelConfig::load_or_default(LEVEL_PATH));

    configure_game(app);
    plugins::register_render(app);
}

/// Headless configuration for integration tests.
///
/// Expects the caller to provide the minimal runtime (MinimalPlugins, states, assets).
/// Preferences stay in memory.
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}
