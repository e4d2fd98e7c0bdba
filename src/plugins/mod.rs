//! Feature plugins.

use bevy::prelude::*;

pub mod character;
pub mod checkpoint;
pub mod core;
pub mod level;
pub mod obstacles;
pub mod physics;
pub mod sound;
pub mod world;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    level::plugin(app);
    sound::plugin(app);
    world::plugin(app);
    character::plugin(app);
    obstacles::plugin(app);
    checkpoint::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
