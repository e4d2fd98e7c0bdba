use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::prefs::{Preferences, SOUNDS_KEY};
use crate::common::test_utils::run_system_once;
use crate::plugins::level::{Level, LevelMode};

use super::*;

fn sound_world() -> World {
    let mut world = World::new();
    world.insert_resource(Preferences::default());
    world.insert_resource(Level::new(1));
    world.init_resource::<BackgroundMusic>();
    world.init_resource::<Messages<ToggleSound>>();
    world.init_resource::<Messages<SoundChanged>>();
    world.init_resource::<Messages<PlaySound>>();
    world
}

fn drain_changes(world: &mut World) -> Vec<SoundChanged> {
    world
        .resource_mut::<Messages<SoundChanged>>()
        .drain()
        .collect()
}

#[test]
fn absent_flag_means_sound_on() {
    let prefs = Preferences::default();
    assert_eq!(sound_activity(&prefs), 0);
    assert!(playing_sounds(&prefs));
}

#[test]
fn any_positive_flag_toggles_back_to_zero() {
    let mut prefs = Preferences::default();
    prefs.set_int(SOUNDS_KEY, 5);
    assert!(!playing_sounds(&prefs));
    assert_eq!(toggle_sound_activity(&mut prefs), 0);
    assert!(playing_sounds(&prefs));
}

#[test]
fn one_toggle_disables_sound_and_announces_it_once() {
    let mut world = sound_world();

    world.write_message(ToggleSound);
    run_system_once(&mut world, handle_sound_toggles);

    assert_eq!(world.resource::<Preferences>().get_int(SOUNDS_KEY), 1);
    assert_eq!(drain_changes(&mut world), vec![SoundChanged(1)]);
}

#[test]
fn disabling_sound_stops_music_and_enabling_resumes_only_in_play() {
    let mut world = sound_world();
    world.resource_mut::<BackgroundMusic>().switch(MusicState::On);

    world.write_message(SoundChanged(1));
    run_system_once(&mut world, music_follows_preference);
    assert_eq!(world.resource::<BackgroundMusic>().state(), MusicState::Off);
    world.resource_mut::<Messages<SoundChanged>>().clear();

    // Not playing yet: enabling sound leaves the music off.
    world.write_message(SoundChanged(0));
    run_system_once(&mut world, music_follows_preference);
    assert_eq!(world.resource::<BackgroundMusic>().state(), MusicState::Off);
    world.resource_mut::<Messages<SoundChanged>>().clear();

    world.resource_mut::<Level>().set_mode(LevelMode::Play);
    world.write_message(SoundChanged(0));
    run_system_once(&mut world, music_follows_preference);
    assert_eq!(world.resource::<BackgroundMusic>().state(), MusicState::On);
}

#[test]
fn effects_are_muted_when_sound_is_off() {
    let mut world = sound_world();
    world.write_message(PlaySound {
        clip: Handle::default(),
    });
    run_system_once(&mut world, play_sound_effects);
    assert_eq!(world.query::<&AudioPlayer>().iter(&world).count(), 1);

    world.resource_mut::<Messages<PlaySound>>().clear();
    world.resource_mut::<Preferences>().set_int(SOUNDS_KEY, 1);
    world.write_message(PlaySound {
        clip: Handle::default(),
    });
    run_system_once(&mut world, play_sound_effects);
    assert_eq!(world.query::<&AudioPlayer>().iter(&world).count(), 1);
}

#[test]
fn music_player_entity_follows_music_state() {
    let mut world = sound_world();
    {
        let mut music = world.resource_mut::<BackgroundMusic>();
        music.set_track(Handle::default());
        music.switch(MusicState::On);
    }

    run_system_once(&mut world, sync_background_music);
    let player = world
        .resource::<BackgroundMusic>()
        .player()
        .expect("music player spawned");
    assert!(world.get::<AudioPlayer>(player).is_some());

    world.resource_mut::<BackgroundMusic>().switch(MusicState::Off);
    run_system_once(&mut world, sync_background_music);
    assert!(world.resource::<BackgroundMusic>().player().is_none());
    assert!(world.get_entity(player).is_err());
}

#[test]
fn music_without_a_track_spawns_nothing() {
    let mut world = sound_world();
    world.resource_mut::<BackgroundMusic>().switch(MusicState::On);

    run_system_once(&mut world, sync_background_music);

    assert!(world.resource::<BackgroundMusic>().player().is_none());
    assert_eq!(world.query::<&AudioPlayer>().iter(&world).count(), 0);
}
