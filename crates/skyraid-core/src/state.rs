//! Session snapshot — the complete visible state produced each tick.

use serde::{Deserialize, Serialize};

use crate::config::TemplateId;
use crate::enums::*;
use crate::events::{Alert, GameEvent};
use crate::types::{Position, SimTime, Velocity};

/// Complete session state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub progress: ProgressView,
    pub score: ScoreView,
    pub player: Option<PlayerView>,
    pub threats: Vec<ThreatView>,
    pub pickups: Vec<PickupView>,
    pub hazards: Vec<HazardView>,
    /// Events that fired during this tick.
    pub events: Vec<GameEvent>,
    pub alerts: Vec<Alert>,
}

/// Wave/entity bookkeeping for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressView {
    pub total_waves_declared: u32,
    pub waves_spawned: u32,
    pub total_entities_declared: u32,
    pub entities_resolved: u32,
    pub completed: bool,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub total: u32,
}

/// Player avatar state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub template: TemplateId,
    pub position: Position,
}

/// A live threat on the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatView {
    pub threat_number: u32,
    pub template: TemplateId,
    pub position: Position,
    pub velocity: Velocity,
    pub state: ThreatState,
}

/// A live pickup on the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub kind: PickupKind,
    pub template: TemplateId,
    pub position: Position,
}

/// A live ambient hazard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardView {
    pub template: TemplateId,
    pub position: Position,
}
