//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    /// Ground and level bounds. Obstacles touching a bound go back to their pool.
    World,
    Character,
    Obstacle,
    Checkpoint,
}
