//! Test helpers.
//!
//! Unit tests drive systems against a bare `World` with `RunSystemOnce` instead of building
//! a full schedule. Deferred commands are flushed right after the run so assertions see
//! spawned entities and inserted components.

use std::time::Duration;

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Insert a default `Time` clock if the world has none.
pub fn ensure_time(world: &mut World) {
    if world.get_resource::<Time>().is_none() {
        world.insert_resource(Time::<()>::default());
    }
}

/// Advance the generic clock by `secs`, as one frame would.
pub fn advance_time(world: &mut World, secs: f32) {
    ensure_time(world);
    world
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(secs));
}
