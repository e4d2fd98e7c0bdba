//! Sound preference, background music and one-shot effects.
//!
//! The sound flag keeps the stored polarity: `0` (or no value at all) means sound is ON,
//! anything else means OFF. UI producers write [`ToggleSound`]; the toggle system is the only
//! writer of the flag and announces each change with [`SoundChanged`].

use bevy::prelude::*;

use crate::common::config::LevelConfig;
use crate::common::prefs::{Preferences, SOUNDS_KEY};
use crate::common::state::GameState;
use crate::plugins::level::{Level, LevelBoot};

/// Request to flip the sound preference.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ToggleSound;

/// The sound flag changed; carries the newly stored value.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundChanged(pub i32);

/// Play a one-shot clip, subject to the sound preference.
#[derive(Message, Debug, Clone)]
pub struct PlaySound {
    pub clip: Handle<AudioSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Off,
    On,
}

#[derive(Resource, Debug, Default)]
pub struct BackgroundMusic {
    track: Option<Handle<AudioSource>>,
    state: MusicState,
    player: Option<Entity>,
}

impl BackgroundMusic {
    pub fn set_track(&mut self, track: Handle<AudioSource>) {
        self.track = Some(track);
    }

    pub fn switch(&mut self, state: MusicState) {
        self.state = state;
    }

    pub fn state(&self) -> MusicState {
        self.state
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }
}

pub fn sound_activity(prefs: &Preferences) -> i32 {
    prefs.get_int(SOUNDS_KEY)
}

pub fn playing_sounds(prefs: &Preferences) -> bool {
    sound_activity(prefs) == 0
}

/// Flip the stored flag and return the new value.
pub fn toggle_sound_activity(prefs: &mut Preferences) -> i32 {
    let next = if sound_activity(prefs) > 0 { 0 } else { 1 };
    prefs.set_int(SOUNDS_KEY, next);
    next
}

pub fn plugin(app: &mut App) {
    app.init_resource::<BackgroundMusic>()
        .add_message::<ToggleSound>()
        .add_message::<SoundChanged>()
        .add_message::<PlaySound>()
        .add_systems(
            OnEnter(GameState::InGame),
            load_level_music.in_set(LevelBoot::Build),
        )
        .add_systems(
            Update,
            (
                handle_sound_toggles,
                music_follows_preference.after(handle_sound_toggles),
                play_sound_effects,
            ),
        )
        .add_systems(PostUpdate, sync_background_music);
}

fn load_level_music(
    config: Res<LevelConfig>,
    assets: Option<Res<AssetServer>>,
    mut music: ResMut<BackgroundMusic>,
) {
    let (Some(path), Some(assets)) = (config.music_track.as_ref(), assets) else {
        return;
    };
    music.set_track(assets.load(path.clone()));
}

pub fn handle_sound_toggles(
    mut requests: MessageReader<ToggleSound>,
    mut prefs: ResMut<Preferences>,
    mut changed: MessageWriter<SoundChanged>,
) {
    for _ in requests.read() {
        let value = toggle_sound_activity(&mut prefs);
        debug!("Sound preference is now {value}");
        changed.write(SoundChanged(value));
    }
}

/// Silence music when sound is switched off; resume it only while the level is playing.
pub fn music_follows_preference(
    mut changed: MessageReader<SoundChanged>,
    level: Res<Level>,
    mut music: ResMut<BackgroundMusic>,
) {
    let Some(SoundChanged(value)) = changed.read().last().copied() else {
        return;
    };
    if value != 0 {
        music.switch(MusicState::Off);
    } else if level.is_playing() {
        music.switch(MusicState::On);
    }
}

pub fn play_sound_effects(
    mut commands: Commands,
    prefs: Res<Preferences>,
    mut requests: MessageReader<PlaySound>,
) {
    let enabled = playing_sounds(&prefs);
    for req in requests.read() {
        if !enabled {
            continue;
        }
        commands.spawn((AudioPlayer::new(req.clip.clone()), PlaybackSettings::DESPAWN));
    }
}

/// Reconcile the looping music entity with `BackgroundMusic::state`.
pub fn sync_background_music(mut commands: Commands, mut music: ResMut<BackgroundMusic>) {
    if !music.is_changed() {
        return;
    }
    match (music.state, music.player) {
        (MusicState::On, None) => {
            let Some(track) = music.track.clone() else {
                return;
            };
            let player = commands
                .spawn((
                    Name::new("BackgroundMusic"),
                    AudioPlayer::new(track),
                    PlaybackSettings::LOOP,
                ))
                .id();
            music.bypass_change_detection().player = Some(player);
        }
        (MusicState::Off, Some(player)) => {
            commands.entity(player).despawn();
            music.bypass_change_detection().player = None;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests;
