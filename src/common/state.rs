//! Scene-level state machine.
//!
//! `GameState` scopes the lifetime of level entities (`DespawnOnExit`).
//! The finer-grained level phase lives in [`crate::plugins::level::Level`].

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
}
