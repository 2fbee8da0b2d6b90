//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Playfield ---

/// Default visible playfield left edge (world units).
pub const PLAYFIELD_MIN_X: f32 = -9.0;

/// Default visible playfield right edge.
pub const PLAYFIELD_MAX_X: f32 = 9.0;

/// Default visible playfield top edge.
pub const PLAYFIELD_TOP_Y: f32 = 6.0;

/// Default visible playfield bottom edge. Threats crossing below this
/// without being eliminated count as escaped.
pub const PLAYFIELD_BOTTOM_Y: f32 = -6.0;

// --- Completion tracking ---

/// Cadence of the completion timeout fallback check (simulated seconds).
pub const TIMEOUT_CHECK_INTERVAL_SECS: f32 = 10.0;

/// Minimum elapsed time before a quiet field (all waves spawned, zero
/// live threats) may force completion. Safety net for mis-declared
/// wave entity counts.
pub const QUIET_FIELD_GRACE_SECS: f32 = 60.0;

/// Default maximum level duration before forced completion (seconds).
pub const DEFAULT_MAX_LEVEL_DURATION_SECS: f32 = 300.0;

/// Default delay between completion and the scene transition request.
pub const DEFAULT_TRANSITION_DELAY_SECS: f32 = 2.0;

// --- Pickups ---

/// Default interval between pickup spawns (seconds).
pub const DEFAULT_PICKUP_INTERVAL_SECS: f32 = 12.0;

/// Default probability that a pickup tick produces a health pickup
/// rather than a weapon pickup.
pub const DEFAULT_HEALTH_PICKUP_CHANCE: f32 = 0.3;

/// Default downward drift speed for spawned pickups (units/s).
pub const DEFAULT_PICKUP_DESCENT_SPEED: f32 = 1.5;

// --- Ambient hazards ---

/// Delay before the first ambient hazard spawn (seconds).
pub const HAZARD_STARTUP_DELAY_SECS: f32 = 10.0;

/// Default interval between ambient hazard spawns (seconds).
pub const DEFAULT_HAZARD_INTERVAL_SECS: f32 = 15.0;

/// Default linear speed applied to spawned hazards (units/s).
pub const DEFAULT_HAZARD_SPEED: f32 = 0.8;

// --- Score ---

/// Score awarded per eliminated threat.
pub const SCORE_PER_ELIMINATION: u32 = 1;

// --- Profiles ---

/// Profile roster index used when nothing is persisted or the persisted
/// index is out of range.
pub const DEFAULT_PROFILE_INDEX: u32 = 0;
