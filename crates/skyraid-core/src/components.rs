//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::config::{FormationId, TemplateId};
use crate::enums::{PickupKind, ThreatState};

/// Marks the player-controlled avatar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerShip {
    /// Visual/identity template chosen via the selected profile.
    pub template: TemplateId,
}

/// A destructible threat spawned by a wave.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Threat {
    /// Engine-assigned number, unique within a session.
    pub threat_number: u32,
    /// Formation this threat materialized from.
    pub formation: FormationId,
    pub template: TemplateId,
    /// Lifecycle state; leaves `Active` exactly once.
    pub state: ThreatState,
}

/// A pickup drifting through the field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub template: TemplateId,
}

/// An ambient background hazard. Cosmetic: never interacts with
/// completion tracking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hazard {
    pub template: TemplateId,
}
