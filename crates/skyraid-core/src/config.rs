//! Level authoring data — the read-only configuration a session runs from.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::{Position, Velocity};

/// Opaque handle for a spawnable entity template. Resolution to sprites,
/// collision shapes, and effects happens outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

/// Opaque handle for a pre-authored enemy formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormationId(pub u32);

/// One scheduled wave. `entity_count` must match the number of
/// destructible entities the formation actually instantiates; the engine
/// asserts this in debug builds but does not verify it in release
/// (the timeout fallback covers mis-declarations there).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDescriptor {
    /// Seconds after level start at which the wave materializes.
    pub offset_secs: f32,
    pub formation: FormationId,
    /// Declared destructible entity count. Zero is legal (cosmetic wave).
    pub entity_count: u32,
}

/// A single threat slot within a formation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatSpec {
    /// Spawn position of this slot.
    pub position: Position,
    /// Initial velocity of this slot.
    pub velocity: Velocity,
    /// Visual template.
    pub template: TemplateId,
}

/// A pre-authored formation: the concrete content behind a FormationId.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub id: FormationId,
    pub threats: Vec<ThreatSpec>,
}

/// A pickup template plus the rendered extent the engine needs for
/// off-screen placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PickupTemplate {
    pub template: TemplateId,
    /// Half the rendered height, so the pickup spawns fully above the
    /// visible top edge.
    pub half_height: f32,
}

/// Pickup spawning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupConfig {
    /// Interval between pickup spawn ticks (seconds).
    pub interval_secs: f32,
    /// Probability in [0,1] of a health pickup per tick.
    pub health_chance: f32,
    pub health_template: Option<PickupTemplate>,
    pub weapon_template: Option<PickupTemplate>,
    /// Downward drift speed applied to spawned pickups.
    pub descent_speed: f32,
}

/// Ambient hazard spawning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardConfig {
    /// Reusable template pool, drawn without replacement per cycle.
    /// An empty pool disables the spawner.
    pub pool: Vec<TemplateId>,
    /// Delay before the first spawn (seconds).
    pub startup_delay_secs: f32,
    /// Interval between spawns (seconds).
    pub interval_secs: f32,
    /// Linear speed applied to every spawned hazard.
    pub speed: f32,
}

/// Horizontal bounds of player movement. Pickups spawn within these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovementBounds {
    pub min_x: f32,
    pub max_x: f32,
}

/// Visible playfield rectangle. Threats leaving below the bottom edge
/// count as escaped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Playfield {
    pub min_x: f32,
    pub max_x: f32,
    pub top_y: f32,
    pub bottom_y: f32,
}

/// Complete authored configuration for one level session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Scheduled waves, in authoring order.
    pub waves: Vec<WaveDescriptor>,
    /// Formation catalog the waves reference.
    pub formations: Vec<Formation>,
    pub pickups: PickupConfig,
    pub hazards: HazardConfig,
    pub player_bounds: MovementBounds,
    pub playfield: Playfield,
    /// Forced-completion ceiling (seconds).
    pub max_duration_secs: f32,
    /// Scene requested after completion.
    pub next_scene: String,
    /// Destination used when `next_scene` cannot be resolved.
    pub fallback_scene: String,
    /// Delay between completion and the transition request (seconds).
    pub transition_delay_secs: f32,
    /// Player avatar templates selectable by profile index.
    pub roster: Vec<TemplateId>,
}

impl LevelConfig {
    /// Look up a formation by id.
    pub fn formation(&self, id: FormationId) -> Option<&Formation> {
        self.formations.iter().find(|f| f.id == id)
    }

    /// Sum of declared entity counts across all waves.
    pub fn total_entities_declared(&self) -> u32 {
        self.waves.iter().map(|w| w.entity_count).sum()
    }
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_PICKUP_INTERVAL_SECS,
            health_chance: DEFAULT_HEALTH_PICKUP_CHANCE,
            health_template: None,
            weapon_template: None,
            descent_speed: DEFAULT_PICKUP_DESCENT_SPEED,
        }
    }
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            pool: Vec::new(),
            startup_delay_secs: HAZARD_STARTUP_DELAY_SECS,
            interval_secs: DEFAULT_HAZARD_INTERVAL_SECS,
            speed: DEFAULT_HAZARD_SPEED,
        }
    }
}

impl Default for MovementBounds {
    fn default() -> Self {
        Self {
            min_x: PLAYFIELD_MIN_X,
            max_x: PLAYFIELD_MAX_X,
        }
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            min_x: PLAYFIELD_MIN_X,
            max_x: PLAYFIELD_MAX_X,
            top_y: PLAYFIELD_TOP_Y,
            bottom_y: PLAYFIELD_BOTTOM_Y,
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            waves: Vec::new(),
            formations: Vec::new(),
            pickups: PickupConfig::default(),
            hazards: HazardConfig::default(),
            player_bounds: MovementBounds::default(),
            playfield: Playfield::default(),
            max_duration_secs: DEFAULT_MAX_LEVEL_DURATION_SECS,
            next_scene: "level_2".to_string(),
            fallback_scene: "main_menu".to_string(),
            transition_delay_secs: DEFAULT_TRANSITION_DELAY_SECS,
            roster: vec![TemplateId(0)],
        }
    }
}
