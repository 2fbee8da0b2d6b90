//! Ambient hazard spawner — rotating background entities.
//!
//! Draws a uniformly random template from a working subset of the pool
//! without replacement; when the subset empties it is refilled from the
//! full pool. Guarantees full coverage of the pool before any repeat.
//! Runs for the entire level lifetime — completion does not stop it.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyraid_core::config::{HazardConfig, Playfield, TemplateId};
use skyraid_core::events::GameEvent;

use crate::scheduler::{Scheduler, TimerId};
use crate::world_setup;

/// Pool-cycling spawner for background hazards.
#[derive(Debug)]
pub struct HazardSpawner {
    pool: Vec<TemplateId>,
    /// Remaining draw set for the current cycle. Always a subset of
    /// `pool` with no duplicates within one cycle.
    working: Vec<TemplateId>,
    speed: f32,
    timer: Option<TimerId>,
}

impl HazardSpawner {
    /// Set up the spawner and schedule its repeating timer. An empty
    /// pool disables the spawner entirely: no timer is registered.
    pub fn schedule(config: &HazardConfig, scheduler: &mut Scheduler, now: u64) -> Self {
        let timer = if config.pool.is_empty() {
            None
        } else {
            Some(scheduler.every_from(now, config.startup_delay_secs, config.interval_secs))
        };
        Self {
            working: config.pool.clone(),
            pool: config.pool.clone(),
            speed: config.speed,
            timer,
        }
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// One spawn tick: draw, materialize, refill on exhaustion.
    pub fn on_tick(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        playfield: &Playfield,
        events: &mut Vec<GameEvent>,
    ) {
        if self.pool.is_empty() {
            return;
        }
        if self.working.is_empty() {
            self.working = self.pool.clone();
        }

        let index = rng.gen_range(0..self.working.len());
        let template = self.working.swap_remove(index);

        world_setup::spawn_hazard(world, rng, template, playfield, self.speed);
        events.push(GameEvent::HazardSpawned {
            template: template.0,
        });
    }

    /// Templates not yet drawn in the current cycle.
    pub fn remaining_in_cycle(&self) -> usize {
        self.working.len()
    }
}
