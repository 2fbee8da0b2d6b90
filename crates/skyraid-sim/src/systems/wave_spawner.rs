//! Wave spawning system — materializes pre-authored formations at their
//! scheduled offsets.
//!
//! Each wave gets a one-shot timer at level start. When a timer fires
//! after the session has already completed, the wave is silently
//! skipped: no entities materialize, no counts are added.

use hecs::World;
use tracing::{debug, warn};

use skyraid_core::config::{LevelConfig, WaveDescriptor};
use skyraid_core::enums::AlertLevel;
use skyraid_core::events::{Alert, GameEvent};

use crate::scheduler::{Scheduler, TimerId};
use crate::tracker::{CompletionCause, CompletionTracker};
use crate::world_setup;

/// Schedules and materializes the level's waves.
#[derive(Debug, Default)]
pub struct WaveSpawner {
    /// Timer handle per wave, in authoring order.
    timers: Vec<TimerId>,
}

impl WaveSpawner {
    /// Register one one-shot timer per wave descriptor.
    pub fn schedule(waves: &[WaveDescriptor], scheduler: &mut Scheduler, now: u64) -> Self {
        let timers = waves
            .iter()
            .map(|wave| scheduler.after(now, wave.offset_secs))
            .collect();
        Self { timers }
    }

    /// Timer handles in wave order.
    pub fn timers(&self) -> &[TimerId] {
        &self.timers
    }

    /// A wave timer fired. Materializes the formation and applies both
    /// session counters; returns the completion cause if this wave
    /// satisfied the exit condition.
    #[allow(clippy::too_many_arguments)]
    pub fn on_wave_due(
        &mut self,
        wave_index: usize,
        world: &mut World,
        config: &LevelConfig,
        tracker: &mut CompletionTracker,
        next_threat_number: &mut u32,
        events: &mut Vec<GameEvent>,
        alerts: &mut Vec<Alert>,
        tick: u64,
    ) -> Option<CompletionCause> {
        let wave = &config.waves[wave_index];

        if tracker.is_completed() {
            debug!(wave_index, "wave timer fired after completion, skipping");
            return None;
        }

        let declared = match config.formation(wave.formation) {
            Some(formation) => {
                let actual = world_setup::spawn_formation(world, formation, next_threat_number);
                debug_assert_eq!(
                    actual, wave.entity_count,
                    "wave {wave_index}: declared entity count {} does not match formation content {}",
                    wave.entity_count, actual
                );
                wave.entity_count
            }
            None => {
                warn!(
                    wave_index,
                    formation = wave.formation.0,
                    "wave references unknown formation, degrading to empty wave"
                );
                alerts.push(Alert {
                    level: AlertLevel::Warning,
                    message: format!(
                        "wave {wave_index} references unknown formation {}",
                        wave.formation.0
                    ),
                    tick,
                });
                0
            }
        };

        events.push(GameEvent::WaveSpawned {
            wave_index: wave_index as u32,
            entity_count: declared,
        });

        tracker.record_wave(declared)
    }
}
