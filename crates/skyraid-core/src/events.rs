//! Events emitted by the simulation for progression tracking and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Lifecycle event produced by a threat entity at the moment of its own
/// resolution. Ephemeral: published once on the session bus, consumed by
/// subscribers, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEvent {
    /// Engine-assigned number of the resolving threat.
    pub threat_number: u32,
    pub kind: ResolutionKind,
}

/// Outbound notifications for UI and other subsystems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A scheduled wave materialized.
    WaveSpawned { wave_index: u32, entity_count: u32 },
    /// A threat resolved (either way).
    EntityResolved {
        threat_number: u32,
        kind: ResolutionKind,
    },
    /// Running score changed.
    ScoreChanged { total: u32 },
    /// A pickup entered the field.
    PickupSpawned { kind: PickupKind },
    /// An ambient hazard entered the field.
    HazardSpawned { template: u32 },
    /// The level session reached its terminal state. Fires at most once.
    LevelCompleted,
    /// The coordinator asked the environment to load the next scene.
    TransitionRequested { destination: String },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
