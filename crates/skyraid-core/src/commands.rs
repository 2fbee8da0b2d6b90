//! Player commands sent from the frontend to the simulation.
//!
//! Commands are validated and queued for processing at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session control ---
    /// Start the configured level from the menu.
    StartLevel,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Return to the main menu after completion.
    ReturnToMenu,

    // --- Combat seam ---
    /// External combat reports a threat destroyed. The engine publishes
    /// the corresponding lifecycle event and removes the entity.
    EliminateThreat { threat_number: u32 },

    // --- Diagnostics ---
    /// Force the completion path (same path as the natural condition,
    /// idempotent).
    ForceComplete,

    // --- Profile selection ---
    /// Persist the selected profile roster index.
    SelectProfile { index: u32 },
}
