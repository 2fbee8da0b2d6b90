//! Pickup spawner — weighted choice between health and weapon pickups
//! on a fixed interval.
//!
//! Each tick draws one uniform value in [0,1): below the configured
//! health chance (and with a health template configured) the health
//! pickup spawns, otherwise the weapon pickup. Spawning stops once the
//! level is completed — checked at tick time; the engine also cancels
//! the timer on completion.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyraid_core::config::{LevelConfig, PickupConfig};
use skyraid_core::enums::{AlertLevel, PickupKind};
use skyraid_core::events::{Alert, GameEvent};

use crate::scheduler::{Scheduler, TimerId};
use crate::tracker::CompletionTracker;
use crate::world_setup;

/// Interval-driven pickup spawner.
#[derive(Debug)]
pub struct PickupSpawner {
    timer: TimerId,
}

impl PickupSpawner {
    /// Schedule the repeating pickup timer.
    pub fn schedule(config: &PickupConfig, scheduler: &mut Scheduler, now: u64) -> Self {
        Self {
            timer: scheduler.every(now, config.interval_secs),
        }
    }

    pub fn timer(&self) -> TimerId {
        self.timer
    }

    /// One spawn tick. Missing templates degrade to a warning and a
    /// skipped tick, never a panic.
    pub fn on_tick(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        config: &LevelConfig,
        tracker: &CompletionTracker,
        events: &mut Vec<GameEvent>,
        alerts: &mut Vec<Alert>,
        tick: u64,
    ) {
        if tracker.is_completed() {
            return;
        }

        let pickups = &config.pickups;
        let roll: f32 = rng.gen_range(0.0..1.0);

        let (kind, template) = if roll < pickups.health_chance && pickups.health_template.is_some()
        {
            (PickupKind::Health, pickups.health_template.as_ref())
        } else {
            (PickupKind::Weapon, pickups.weapon_template.as_ref())
        };

        let Some(template) = template else {
            tracing::warn!(?kind, "pickup template not configured, skipping spawn tick");
            alerts.push(Alert {
                level: AlertLevel::Warning,
                message: format!("{kind:?} pickup template not configured"),
                tick,
            });
            return;
        };

        world_setup::spawn_pickup(
            world,
            rng,
            kind,
            template,
            config.player_bounds.min_x,
            config.player_bounds.max_x,
            config.playfield.top_y,
            pickups.descent_speed,
        );
        events.push(GameEvent::PickupSpawned { kind });
    }
}
