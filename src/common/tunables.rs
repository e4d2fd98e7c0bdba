//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub character_speed: f32,
    /// Seconds a knocked-down character waits before reviving at its respawn point.
    pub respawn_delay: f32,
    pub camera_responsiveness: f32,
    /// Fixed-step rate for movement and physics.
    pub fixed_hz: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            character_speed: 320.0,
            respawn_delay: 1.0,
            camera_responsiveness: 5.0,
            fixed_hz: 60.0,
        }
    }
}
