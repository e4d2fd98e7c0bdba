//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `obstacle_run::game::configure_headless` to install gameplay plugins.

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

pub fn app_headless() -> App {
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so SceneSpawner exists for physics.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    // Audio handles are created without the audio backend.
    app.init_asset::<AudioSource>();

    obstacle_run::game::configure_headless(&mut app);
    // Run the plugin lifecycle that `App::run` would (some plugins register resources in `finish`).
    app.finish();
    app.cleanup();
    app
}

/// Headless app whose clock advances by `step_ms` every update.
pub fn app_stepped(step_ms: u64) -> App {
    let mut app = app_headless();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        step_ms,
    )));
    app
}
