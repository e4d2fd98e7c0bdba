mod common;

use std::collections::HashSet;

use bevy::prelude::*;
use obstacle_run::plugins::level::{Level, LevelFinished, LevelMode, LevelOutcome};
use obstacle_run::plugins::obstacles::{PoolSpawner, SlotState, SpawnerPhase};

fn slot_states(app: &mut App) -> Vec<(Entity, SlotState)> {
    app.world_mut()
        .query::<(Entity, &SlotState)>()
        .iter(app.world())
        .map(|(e, s)| (e, *s))
        .collect()
}

fn active_slots(app: &mut App) -> usize {
    app.world_mut()
        .query::<&SlotState>()
        .iter(app.world())
        .filter(|s| **s == SlotState::Active)
        .count()
}

#[test]
fn spawners_activate_slots_while_playing() {
    let mut app = common::app_stepped(100);
    app.update();
    assert_eq!(active_slots(&mut app), 0);

    // 1.5 s period on the first spawner.
    for _ in 0..20 {
        app.update();
    }
    assert!(active_slots(&mut app) >= 1);
}

#[test]
fn finishing_the_level_stops_every_spawner() {
    let mut app = common::app_stepped(100);
    // Play long enough for the first spawner to fire.
    for _ in 0..20 {
        app.update();
    }

    app.world_mut().write_message(LevelFinished {
        outcome: LevelOutcome::Completed,
    });
    app.update();
    assert_eq!(app.world().resource::<Level>().mode(), LevelMode::Completed);

    app.update();
    let running = app
        .world_mut()
        .query::<&PoolSpawner>()
        .iter(app.world())
        .filter(|s| s.phase() != SpawnerPhase::Stopped)
        .count();
    assert_eq!(running, 0);

    // A stopped spawner is the only thing that moves a slot from Inactive to Active.
    let mut seen_inactive = HashSet::new();
    for _ in 0..40 {
        for (e, state) in slot_states(&mut app) {
            match state {
                SlotState::Inactive => {
                    seen_inactive.insert(e);
                }
                _ => assert!(
                    !seen_inactive.contains(&e),
                    "slot {e} reactivated after the level ended"
                ),
            }
        }
        app.update();
    }
    assert!(!seen_inactive.is_empty());
}

#[test]
fn completed_level_ignores_a_later_loss() {
    let mut app = common::app_stepped(100);
    app.update();

    app.world_mut().write_message(LevelFinished {
        outcome: LevelOutcome::Completed,
    });
    app.update();
    app.world_mut().write_message(LevelFinished {
        outcome: LevelOutcome::Lost,
    });
    app.update();

    assert_eq!(app.world().resource::<Level>().mode(), LevelMode::Completed);
}
