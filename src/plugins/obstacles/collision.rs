//! Obstacle contact resolution.
//!
//! Reads Avian `CollisionStart` messages:
//! - obstacle vs character: report a `CharacterHit`, the obstacle keeps going
//! - obstacle vs world bound: mark the slot `PendingReturn`

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::plugins::character::{Character, CharacterHit};

use super::pool::{PooledObstacle, SlotState};

/// The entity that carries gameplay components for one side of a contact.
#[inline]
fn gameplay_owner(collider: Entity, body: Option<Entity>) -> Entity {
    body.unwrap_or(collider)
}

pub fn resolve_obstacle_collisions(
    mut started: MessageReader<CollisionStart>,
    mut q_slots: Query<&mut SlotState, With<PooledObstacle>>,
    q_layers: Query<&CollisionLayers>,
    q_characters: Query<(), With<Character>>,
    mut hits: MessageWriter<CharacterHit>,
) {
    for ev in started.read() {
        let (slot, other, other_body) = if q_slots.contains(ev.collider1) {
            (ev.collider1, ev.collider2, ev.body2)
        } else if q_slots.contains(ev.collider2) {
            (ev.collider2, ev.collider1, ev.body1)
        } else {
            continue;
        };

        let Ok(mut state) = q_slots.get_mut(slot) else {
            continue;
        };
        if *state != SlotState::Active {
            continue;
        }

        let owner = gameplay_owner(other, other_body);
        if q_characters.contains(owner) {
            hits.write(CharacterHit { character: owner });
            continue;
        }

        let Ok(layers) = q_layers.get(other) else {
            continue;
        };
        if layers.memberships.has_all(Layer::World) {
            *state = SlotState::PendingReturn;
        }
    }
}
