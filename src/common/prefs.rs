//! Persisted player preferences.
//!
//! A small key/value store in the spirit of mobile "player prefs": integers and strings
//! addressed by name, written to a JSON file. Missing keys read as `0` / `""`, which is
//! what the sound flag and the training flag rely on.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Integer flag for sound. Stored `0` means sound is ON.
pub const SOUNDS_KEY: &str = "sounds";
/// 1-based index of the selected character.
pub const CHARACTER_KEY: &str = "character";
/// Stored `0` means the training sequence has not been completed yet.
pub const TRAINING_KEY: &str = "training";

/// Key holding the JSON stats blob for a character index.
pub fn character_stats_key(index: i32) -> String {
    format!("character-{index}")
}

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("failed to access preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed preferences file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("preferences have no backing file")]
    NoPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Int(i32),
    Str(String),
}

#[derive(Resource, Debug, Default, Clone)]
pub struct Preferences {
    values: BTreeMap<String, PrefValue>,
    /// Contents of the backing file as of the last load or save.
    saved: BTreeMap<String, PrefValue>,
    path: Option<PathBuf>,
}

impl Preferences {
    /// In-memory store backed by `path` but not read from it.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PrefsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let values: BTreeMap<String, PrefValue> = serde_json::from_str(&text)?;
        Ok(Self {
            saved: values.clone(),
            values,
            path: Some(path.to_path_buf()),
        })
    }

    /// Load `path`, falling back to an empty store bound to the same path.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::with_path(path);
        }
        match Self::load(path) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!("Ignoring preferences: {err}");
                Self::with_path(path)
            }
        }
    }

    pub fn save(&mut self) -> Result<(), PrefsError> {
        let path = self.path.as_ref().ok_or(PrefsError::NoPath)?;
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(path, text).map_err(|source| PrefsError::Io {
            path: path.clone(),
            source,
        })?;
        self.saved = self.values.clone();
        Ok(())
    }

    /// Values differ from what was last loaded or saved.
    pub fn has_unsaved_changes(&self) -> bool {
        self.values != self.saved
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get_int(&self, key: &str) -> i32 {
        match self.values.get(key) {
            Some(PrefValue::Int(v)) => *v,
            _ => 0,
        }
    }

    pub fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_owned(), PrefValue::Int(value));
    }

    pub fn get_string(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(PrefValue::Str(s)) => s,
            _ => "",
        }
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_owned(), PrefValue::Str(value.into()));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Write preferences back to disk whenever they differ from the file.
pub fn persist_preferences(mut prefs: ResMut<Preferences>) {
    if prefs.path().is_none() || !prefs.has_unsaved_changes() {
        return;
    }
    if let Err(err) = prefs.bypass_change_detection().save() {
        warn!("Could not persist preferences: {err}");
    }
}
