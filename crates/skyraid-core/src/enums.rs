//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    /// Completion fired and the scene transition has been requested.
    LevelComplete,
}

/// How a destructible threat left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionKind {
    /// Destroyed by the player (or any external combat source).
    Eliminated,
    /// Left the playable boundary intact.
    Escaped,
}

/// Lifecycle state of a spawned threat entity. Transitions out of
/// `Active` exactly once — the two resolved states are mutually
/// exclusive per entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatState {
    #[default]
    Active,
    Eliminated,
    Escaped,
}

/// Pickup kind chosen per spawn tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Health,
    Weapon,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl ThreatState {
    /// True once the entity has emitted its resolution event.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ThreatState::Active)
    }
}
