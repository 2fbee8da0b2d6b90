//! Cleanup system: removes resolved threats and off-screen drifters.
//!
//! Runs after the lifecycle bus has been drained for the tick, so no
//! subscriber ever observes a partially-destroyed entity. Uses a
//! pre-allocated buffer to avoid per-tick allocation.

use hecs::{Entity, World};

use skyraid_core::components::{Hazard, Pickup, Threat};
use skyraid_core::config::Playfield;
use skyraid_core::types::Position;

/// Margin below the playfield before drifting pickups/hazards despawn.
const OFFSCREEN_MARGIN: f32 = 3.0;

/// Remove entities that have resolved or drifted out of the world.
pub fn run(world: &mut World, playfield: &Playfield, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    // Threats whose resolution event has already been published.
    for (entity, threat) in world.query_mut::<&Threat>() {
        if threat.state.is_resolved() {
            despawn_buffer.push(entity);
        }
    }

    let floor = playfield.bottom_y - OFFSCREEN_MARGIN;

    // Pickups that fell through the field uncollected.
    for (entity, (pos, _pickup)) in world.query_mut::<(&Position, &Pickup)>() {
        if pos.0.y < floor {
            despawn_buffer.push(entity);
        }
    }

    // Hazards that drifted out.
    for (entity, (pos, _hazard)) in world.query_mut::<(&Position, &Hazard)>() {
        if pos.0.y < floor {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
