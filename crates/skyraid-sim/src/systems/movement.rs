//! Movement integration: position += velocity * dt.

use hecs::World;

use skyraid_core::constants::DT;
use skyraid_core::types::{Position, Velocity};

/// Integrate all moving entities by one tick.
pub fn run(world: &mut World) {
    for (_entity, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        pos.0 += vel.0 * DT;
    }
}
