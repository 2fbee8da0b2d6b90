//! Escape detection — threats leaving the playable boundary.
//!
//! A threat that crosses below the playfield's bottom edge while still
//! active emits exactly one `Escaped` event. The state flip happens
//! here, before the cleanup pass, so every subscriber observes the event
//! while the entity still exists.

use hecs::World;

use skyraid_core::components::Threat;
use skyraid_core::config::Playfield;
use skyraid_core::enums::{ResolutionKind, ThreatState};
use skyraid_core::events::ResolutionEvent;

use crate::bus::LifecycleBus;

/// Mark active threats below the bottom edge as escaped and publish
/// their resolution events.
pub fn run(world: &mut World, playfield: &Playfield, bus: &mut LifecycleBus) {
    for (_entity, (threat, pos)) in
        world.query_mut::<(&mut Threat, &skyraid_core::types::Position)>()
    {
        if threat.state != ThreatState::Active {
            continue;
        }
        if pos.0.y < playfield.bottom_y {
            threat.state = ThreatState::Escaped;
            bus.publish(ResolutionEvent {
                threat_number: threat.threat_number,
                kind: ResolutionKind::Escaped,
            });
        }
    }
}
