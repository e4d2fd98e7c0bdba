//! Level layout configuration.
//!
//! Loaded from JSON and validated once at load time, so a bad spawner period is caught
//! before the level starts rather than mid-run.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read level config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("spawner #{index} has non-positive period {period}")]
    InvalidPeriod { index: usize, period: f32 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub position: [f32; 2],
    /// Orientation in degrees, counter-clockwise.
    pub rotation_deg: f32,
    pub period_secs: f32,
    pub pool_size: usize,
    pub launch_velocity: [f32; 2],
    pub obstacle_size: [f32; 2],
    /// Asset path of a one-shot clip played on each activation.
    pub sound: Option<String>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            position: [600.0, 40.0],
            rotation_deg: 0.0,
            period_secs: 1.5,
            pool_size: 4,
            launch_velocity: [-260.0, 0.0],
            obstacle_size: [28.0, 28.0],
            sound: None,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub level_number: u32,
    /// Brains awarded for this level.
    pub brains: u32,
    pub start_position: [f32; 2],
    /// Length of the training sequence. `None` means the level has no training.
    pub training_secs: Option<f32>,
    pub spawners: Vec<SpawnerConfig>,
    pub checkpoints: Vec<[f32; 2]>,
    pub music_track: Option<String>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            level_number: 1,
            brains: 0,
            start_position: [-400.0, 40.0],
            training_secs: None,
            spawners: vec![
                SpawnerConfig::default(),
                SpawnerConfig {
                    position: [600.0, 160.0],
                    period_secs: 2.5,
                    pool_size: 3,
                    ..default()
                },
            ],
            checkpoints: vec![[0.0, 20.0]],
            music_track: None,
        }
    }
}

impl LevelConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Load `path` if present; anything unreadable falls back to the built-in level.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|err| {
            warn!("Using default level layout: {err}");
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, spawner) in self.spawners.iter().enumerate() {
            // `!(x > 0)` also rejects NaN.
            if !(spawner.period_secs > 0.0) {
                return Err(ConfigError::InvalidPeriod {
                    index,
                    period: spawner.period_secs,
                });
            }
        }
        Ok(())
    }
}
