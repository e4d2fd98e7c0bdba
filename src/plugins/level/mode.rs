//! Level phase and its transition table.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelMode {
    #[default]
    Start,
    Training,
    Play,
    Completed,
    Losing,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level mode {0:?}")]
pub struct ModeParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal level transition {from} -> {to}")]
pub struct IllegalTransition {
    pub from: LevelMode,
    pub to: LevelMode,
}

impl LevelMode {
    pub const ALL: [LevelMode; 5] = [
        LevelMode::Start,
        LevelMode::Training,
        LevelMode::Play,
        LevelMode::Completed,
        LevelMode::Losing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LevelMode::Start => "Start",
            LevelMode::Training => "Training",
            LevelMode::Play => "Play",
            LevelMode::Completed => "Completed",
            LevelMode::Losing => "Losing",
        }
    }

    /// No gameplay transition leaves a terminal mode; a new run rebuilds the level.
    pub fn is_terminal(self) -> bool {
        matches!(self, LevelMode::Completed | LevelMode::Losing)
    }

    /// The validated transition table used by gameplay flows.
    ///
    /// `Level::set_mode` bypasses this on purpose; only `Level::try_set_mode` consults it.
    pub fn can_transition_to(self, to: LevelMode) -> bool {
        use LevelMode::*;
        matches!(
            (self, to),
            (Start, Training) | (Start, Play) | (Training, Play) | (Play, Completed) | (Play, Losing)
        )
    }
}

impl fmt::Display for LevelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LevelMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModeParseError(s.to_owned()))
    }
}
