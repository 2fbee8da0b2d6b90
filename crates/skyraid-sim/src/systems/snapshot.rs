//! Snapshot system: queries the ECS world and builds a complete
//! SessionSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use skyraid_core::components::*;
use skyraid_core::enums::GamePhase;
use skyraid_core::events::{Alert, GameEvent};
use skyraid_core::state::*;
use skyraid_core::types::{Position, SimTime, Velocity};

use crate::tracker::{CompletionTracker, ScoreState};

/// Build a complete SessionSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    tracker: &CompletionTracker,
    score: &ScoreState,
    events: Vec<GameEvent>,
    alerts: Vec<Alert>,
) -> SessionSnapshot {
    let session = tracker.session();

    SessionSnapshot {
        time: *time,
        phase,
        progress: ProgressView {
            total_waves_declared: session.total_waves_declared,
            waves_spawned: session.waves_spawned,
            total_entities_declared: session.total_entities_declared,
            entities_resolved: session.entities_resolved,
            completed: session.completed,
        },
        score: ScoreView { total: score.total },
        player: build_player(world),
        threats: build_threats(world),
        pickups: build_pickups(world),
        hazards: build_hazards(world),
        events,
        alerts,
    }
}

fn build_player(world: &World) -> Option<PlayerView> {
    world
        .query::<(&PlayerShip, &Position)>()
        .iter()
        .next()
        .map(|(_, (ship, pos))| PlayerView {
            template: ship.template,
            position: *pos,
        })
}

fn build_threats(world: &World) -> Vec<ThreatView> {
    let mut threats: Vec<ThreatView> = world
        .query::<(&Threat, &Position, &Velocity)>()
        .iter()
        .map(|(_, (threat, pos, vel))| ThreatView {
            threat_number: threat.threat_number,
            template: threat.template,
            position: *pos,
            velocity: *vel,
            state: threat.state,
        })
        .collect();

    threats.sort_by_key(|t| t.threat_number);
    threats
}

fn build_pickups(world: &World) -> Vec<PickupView> {
    world
        .query::<(&Pickup, &Position)>()
        .iter()
        .map(|(_, (pickup, pos))| PickupView {
            kind: pickup.kind,
            template: pickup.template,
            position: *pos,
        })
        .collect()
}

fn build_hazards(world: &World) -> Vec<HazardView> {
    world
        .query::<(&Hazard, &Position)>()
        .iter()
        .map(|(_, (hazard, pos))| HazardView {
            template: hazard.template,
            position: *pos,
        })
        .collect()
}
