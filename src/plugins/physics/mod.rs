//! Physics setup: dynamic bodies with gravity off, moved by velocities gameplay sets.
//! The length unit follows the pixel scale used by checkpoints.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let tunables = app
        .world()
        .get_resource::<Tunables>()
        .cloned()
        .unwrap_or_default();

    app.add_plugins(PhysicsPlugins::default().with_length_unit(tunables.pixels_per_meter))
        .insert_resource(Gravity(Vec2::ZERO))
        .insert_resource(Time::<Fixed>::from_hz(tunables.fixed_hz));
}
