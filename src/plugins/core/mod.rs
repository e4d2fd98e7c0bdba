//! Core plugin: shared resources, global settings and preference persistence.
//!
//! Resources already inserted by the composition root (a loaded `LevelConfig`, a file-backed
//! `Preferences`) are kept; anything missing falls back to its default.

use bevy::prelude::*;

use crate::common::config::LevelConfig;
use crate::common::prefs::{Preferences, persist_preferences};
use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>()
        .init_resource::<LevelConfig>()
        .init_resource::<Preferences>()
        .insert_resource(ClearColor(Color::srgb(0.07, 0.08, 0.1)))
        .add_systems(Last, persist_preferences);
}
