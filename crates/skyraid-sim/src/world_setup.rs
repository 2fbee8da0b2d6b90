//! Entity spawn factories for setting up the session world.
//!
//! Creates the player avatar, formation threats, pickups, and ambient
//! hazards with appropriate component bundles.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyraid_core::components::*;
use skyraid_core::config::{Formation, PickupTemplate, Playfield, TemplateId};
use skyraid_core::enums::{PickupKind, ThreatState};
use skyraid_core::types::{Position, Velocity};

/// Spawn the player avatar at the bottom center of the playfield.
pub fn spawn_player(world: &mut World, template: TemplateId, playfield: &Playfield) -> hecs::Entity {
    let x = (playfield.min_x + playfield.max_x) / 2.0;
    let y = playfield.bottom_y + 1.0;
    world.spawn((
        PlayerShip { template },
        Position::new(x, y),
        Velocity::new(0.0, 0.0),
    ))
}

/// Materialize a formation: one threat entity per authored slot.
/// Returns the number of entities actually instantiated.
pub fn spawn_formation(
    world: &mut World,
    formation: &Formation,
    next_threat_number: &mut u32,
) -> u32 {
    for spec in &formation.threats {
        let threat_number = *next_threat_number;
        *next_threat_number += 1;
        world.spawn((
            Threat {
                threat_number,
                formation: formation.id,
                template: spec.template,
                state: ThreatState::Active,
            },
            spec.position,
            spec.velocity,
        ));
    }
    formation.threats.len() as u32
}

/// Spawn a pickup above the visible top edge at a random x within the
/// player's movement bounds. It enters already fully off-screen: y is
/// the top edge plus half the template's rendered height.
pub fn spawn_pickup(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    kind: PickupKind,
    template: &PickupTemplate,
    min_x: f32,
    max_x: f32,
    top_y: f32,
    descent_speed: f32,
) -> hecs::Entity {
    let x = if max_x > min_x {
        rng.gen_range(min_x..max_x)
    } else {
        min_x
    };
    world.spawn((
        Pickup {
            kind,
            template: template.template,
        },
        Position::new(x, top_y + template.half_height),
        Velocity::new(0.0, -descent_speed),
    ))
}

/// Spawn an ambient hazard above the playfield, drifting down at the
/// configured constant speed.
pub fn spawn_hazard(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    template: TemplateId,
    playfield: &Playfield,
    speed: f32,
) -> hecs::Entity {
    let x = if playfield.max_x > playfield.min_x {
        rng.gen_range(playfield.min_x..playfield.max_x)
    } else {
        playfield.min_x
    };
    world.spawn((
        Hazard { template },
        Position::new(x, playfield.top_y + 1.0),
        Velocity::new(0.0, -speed),
    ))
}

/// Count threats still in the Active state.
pub fn live_threat_count(world: &World) -> u32 {
    world
        .query::<&Threat>()
        .iter()
        .filter(|(_, t)| t.state == ThreatState::Active)
        .count() as u32
}

/// Find the entity carrying a given threat number, if still present.
pub fn find_threat(world: &World, threat_number: u32) -> Option<hecs::Entity> {
    world
        .query::<&Threat>()
        .iter()
        .find(|(_, t)| t.threat_number == threat_number)
        .map(|(entity, _)| entity)
}
