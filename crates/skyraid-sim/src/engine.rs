//! Session engine — the core of the progression system.
//!
//! `SessionEngine` owns the hecs ECS world, the timer scheduler, the
//! lifecycle bus, and the completion tracker. It processes player
//! commands, runs all systems on a single logical timeline, and
//! produces `SessionSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::{HashMap, VecDeque};

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use skyraid_core::commands::PlayerCommand;
use skyraid_core::components::Threat;
use skyraid_core::config::LevelConfig;
use skyraid_core::constants::TIMEOUT_CHECK_INTERVAL_SECS;
use skyraid_core::enums::{GamePhase, ResolutionKind, ThreatState};
use skyraid_core::events::{Alert, GameEvent, ResolutionEvent};
use skyraid_core::state::SessionSnapshot;
use skyraid_core::types::SimTime;

use crate::bus::{LifecycleBus, SubscriberId};
use crate::coordinator::{ProgressionCoordinator, SceneRouter, StaticSceneRouter, TransitionError};
use crate::profile::{selected_or_default, MemoryProfileStore, ProfileStore};
use crate::scheduler::{Scheduler, TimerId};
use crate::systems;
use crate::systems::hazard_spawner::HazardSpawner;
use crate::systems::pickup_spawner::PickupSpawner;
use crate::systems::wave_spawner::WaveSpawner;
use crate::tracker::{CompletionCause, CompletionTracker, ScoreState};
use crate::world_setup;

/// Configuration for starting a new session engine.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal). Consumed by the runner, not
    /// the tick logic.
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
        }
    }
}

/// Fatal session failures surfaced through `tick`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("scene transition failed: {0}")]
    Transition(#[from] TransitionError),
}

/// What a fired timer means to the engine.
#[derive(Debug, Clone, Copy)]
enum TimerTask {
    /// A scheduled wave is due (index into the level's wave list).
    Wave(usize),
    PickupTick,
    HazardTick,
    TimeoutCheck,
    /// Post-completion transition delay elapsed.
    Transition,
}

/// The session engine. Owns the ECS world and all progression state.
pub struct SessionEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    level: LevelConfig,
    command_queue: VecDeque<PlayerCommand>,

    scheduler: Scheduler,
    tasks: HashMap<TimerId, TimerTask>,
    fired_buffer: Vec<TimerId>,

    bus: LifecycleBus,
    tracker_sub: SubscriberId,
    score_sub: SubscriberId,

    tracker: CompletionTracker,
    score: ScoreState,
    coordinator: ProgressionCoordinator,
    router: Box<dyn SceneRouter>,
    profiles: Box<dyn ProfileStore>,

    wave_spawner: WaveSpawner,
    hazard_spawner: Option<HazardSpawner>,
    pickup_spawner: Option<PickupSpawner>,

    next_threat_number: u32,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<GameEvent>,
    alerts: Vec<Alert>,
}

impl SessionEngine {
    /// Create an engine with default collaborators: a permissive scene
    /// router and an in-memory profile store.
    pub fn new(config: SimConfig, level: LevelConfig) -> Self {
        Self::with_deps(
            config,
            level,
            Box::new(StaticSceneRouter::permissive()),
            Box::<MemoryProfileStore>::default(),
        )
    }

    /// Create an engine with explicit environment collaborators.
    pub fn with_deps(
        config: SimConfig,
        level: LevelConfig,
        router: Box<dyn SceneRouter>,
        profiles: Box<dyn ProfileStore>,
    ) -> Self {
        let mut bus = LifecycleBus::new();
        let tracker_sub = bus.subscribe();
        let score_sub = bus.subscribe();

        let coordinator = ProgressionCoordinator::new(
            level.next_scene.clone(),
            level.fallback_scene.clone(),
            level.transition_delay_secs,
        );

        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            level,
            command_queue: VecDeque::new(),
            scheduler: Scheduler::new(),
            tasks: HashMap::new(),
            fired_buffer: Vec::new(),
            bus,
            tracker_sub,
            score_sub,
            tracker: CompletionTracker::default(),
            score: ScoreState::default(),
            coordinator,
            router,
            profiles,
            wave_spawner: WaveSpawner::default(),
            hazard_spawner: None,
            pickup_spawner: None,
            next_threat_number: 0,
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting
    /// snapshot. The only fatal failure is an unroutable scene
    /// transition; everything else degrades with a warning.
    pub fn tick(&mut self) -> Result<SessionSnapshot, SessionError> {
        self.process_commands();

        if matches!(self.phase, GamePhase::Active | GamePhase::LevelComplete) {
            self.run_timers()?;
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        let alerts = std::mem::take(&mut self.alerts);
        Ok(systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.tracker,
            &self.score,
            events,
            alerts,
        ))
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only view of the completion tracker.
    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartLevel => {
                if matches!(self.phase, GamePhase::MainMenu | GamePhase::LevelComplete) {
                    self.start_level();
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::ReturnToMenu => {
                if self.phase == GamePhase::LevelComplete {
                    self.phase = GamePhase::MainMenu;
                }
            }
            PlayerCommand::EliminateThreat { threat_number } => {
                self.eliminate_threat(threat_number);
            }
            PlayerCommand::ForceComplete => {
                if let Some(cause) = self.tracker.force_complete() {
                    self.on_completed(cause);
                }
            }
            PlayerCommand::SelectProfile { index } => {
                if (index as usize) < self.level.roster.len() {
                    if let Err(err) = self.profiles.save(index) {
                        warn!(%err, "failed to persist profile selection");
                    }
                } else {
                    warn!(
                        index,
                        roster_len = self.level.roster.len(),
                        "profile selection out of range, ignoring"
                    );
                }
            }
        }
    }

    /// Reset all per-session state and schedule the level's timers.
    fn start_level(&mut self) {
        self.world.clear();
        self.time = SimTime::default();
        self.scheduler = Scheduler::new();
        self.tasks.clear();
        self.score = ScoreState::default();
        self.next_threat_number = 0;
        self.events.clear();
        self.alerts.clear();

        // Fresh bus: subscriptions are tied to the session lifetime.
        self.bus = LifecycleBus::new();
        self.tracker_sub = self.bus.subscribe();
        self.score_sub = self.bus.subscribe();

        self.tracker = CompletionTracker::start(
            self.level.waves.len() as u32,
            self.time.tick,
            self.level.max_duration_secs,
            skyraid_core::constants::QUIET_FIELD_GRACE_SECS,
        );
        self.coordinator = ProgressionCoordinator::new(
            self.level.next_scene.clone(),
            self.level.fallback_scene.clone(),
            self.level.transition_delay_secs,
        );

        // Player avatar from the persisted profile selection.
        let index = selected_or_default(self.profiles.as_ref(), self.level.roster.len());
        if let Some(template) = self.level.roster.get(index as usize).copied() {
            world_setup::spawn_player(&mut self.world, template, &self.level.playfield);
        } else {
            warn!("empty profile roster, starting without player avatar");
        }

        let now = self.time.tick;

        // Waves first: due wave timers must run before the timeout check
        // registered below when both fire in the same tick.
        self.wave_spawner = WaveSpawner::schedule(&self.level.waves, &mut self.scheduler, now);
        for (index, id) in self.wave_spawner.timers().iter().enumerate() {
            self.tasks.insert(*id, TimerTask::Wave(index));
        }

        let hazard = HazardSpawner::schedule(&self.level.hazards, &mut self.scheduler, now);
        if let Some(id) = hazard.timer() {
            self.tasks.insert(id, TimerTask::HazardTick);
        }
        self.hazard_spawner = Some(hazard);

        let pickup = PickupSpawner::schedule(&self.level.pickups, &mut self.scheduler, now);
        self.tasks.insert(pickup.timer(), TimerTask::PickupTick);
        self.pickup_spawner = Some(pickup);

        let timeout = self.scheduler.every(now, TIMEOUT_CHECK_INTERVAL_SECS);
        self.tasks.insert(timeout, TimerTask::TimeoutCheck);

        self.phase = GamePhase::Active;
        info!(
            waves = self.level.waves.len(),
            entities = self.level.total_entities_declared(),
            "level session started"
        );
    }

    /// Poll the scheduler and dispatch every due timer in registration
    /// order. Each handler completes before the next begins, which is
    /// what keeps the session counters consistent without locks.
    fn run_timers(&mut self) -> Result<(), SessionError> {
        let mut fired = std::mem::take(&mut self.fired_buffer);
        self.scheduler.poll(self.time.tick, &mut fired);

        for id in &fired {
            let Some(task) = self.tasks.get(id).copied() else {
                continue;
            };
            match task {
                TimerTask::Wave(index) => {
                    self.tasks.remove(id);
                    let completed = self.wave_spawner.on_wave_due(
                        index,
                        &mut self.world,
                        &self.level,
                        &mut self.tracker,
                        &mut self.next_threat_number,
                        &mut self.events,
                        &mut self.alerts,
                        self.time.tick,
                    );
                    if let Some(cause) = completed {
                        self.on_completed(cause);
                    }
                }
                TimerTask::PickupTick => {
                    if let Some(spawner) = self.pickup_spawner.as_mut() {
                        spawner.on_tick(
                            &mut self.world,
                            &mut self.rng,
                            &self.level,
                            &self.tracker,
                            &mut self.events,
                            &mut self.alerts,
                            self.time.tick,
                        );
                    }
                }
                TimerTask::HazardTick => {
                    if let Some(spawner) = self.hazard_spawner.as_mut() {
                        spawner.on_tick(
                            &mut self.world,
                            &mut self.rng,
                            &self.level.playfield,
                            &mut self.events,
                        );
                    }
                }
                TimerTask::TimeoutCheck => {
                    let live = world_setup::live_threat_count(&self.world);
                    if let Some(cause) =
                        self.tracker.timeout_check(self.time.elapsed_secs, live)
                    {
                        self.on_completed(cause);
                    }
                }
                TimerTask::Transition => {
                    self.tasks.remove(id);
                    let destination = self.coordinator.fire_transition(self.router.as_mut())?;
                    info!(%destination, "requesting scene transition");
                    self.events.push(GameEvent::TransitionRequested { destination });
                    self.phase = GamePhase::LevelComplete;
                }
            }
        }

        fired.clear();
        self.fired_buffer = fired;
        Ok(())
    }

    /// Run the per-tick world systems and drain the lifecycle bus.
    fn run_systems(&mut self) {
        // 1. Movement integration
        systems::movement::run(&mut self.world);
        // 2. Escape detection (publishes Escaped events)
        systems::bounds::run(&mut self.world, &self.level.playfield, &mut self.bus);
        // 3. Lifecycle event consumption: tracker counters first, then
        //    score/outbound notifications.
        for event in self.bus.drain(self.tracker_sub) {
            if let Some(cause) = self.tracker.record_resolution(event) {
                self.on_completed(cause);
            }
        }
        for event in self.bus.drain(self.score_sub) {
            self.events.push(GameEvent::EntityResolved {
                threat_number: event.threat_number,
                kind: event.kind,
            });
            if self
                .score
                .apply(event.kind, skyraid_core::constants::SCORE_PER_ELIMINATION)
            {
                self.events.push(GameEvent::ScoreChanged {
                    total: self.score.total,
                });
            }
        }
        // 4. Cleanup (resolved threats, off-screen drifters) — after the
        //    bus drain so every subscriber saw the entity's last event.
        systems::cleanup::run(&mut self.world, &self.level.playfield, &mut self.despawn_buffer);
    }

    /// Mark an active threat eliminated and publish its lifecycle event.
    /// Unknown or already-resolved threats are a no-op.
    fn eliminate_threat(&mut self, threat_number: u32) {
        let mut resolved = false;
        for (_entity, threat) in self.world.query_mut::<&mut Threat>() {
            if threat.threat_number == threat_number {
                if threat.state == ThreatState::Active {
                    threat.state = ThreatState::Eliminated;
                    resolved = true;
                }
                break;
            }
        }
        if resolved {
            self.bus.publish(ResolutionEvent {
                threat_number,
                kind: ResolutionKind::Eliminated,
            });
        } else {
            debug!(threat_number, "eliminate command for unknown or resolved threat");
        }
    }

    /// The single completion path. Reached from resolution events, wave
    /// spawns, the timeout fallback, and the manual trigger — but only
    /// by the caller that won the tracker's claim.
    fn on_completed(&mut self, cause: CompletionCause) {
        info!(?cause, tick = self.time.tick, "level completed");
        self.events.push(GameEvent::LevelCompleted);

        // Pickups stop at completion. Hazards keep running by design.
        if let Some(spawner) = &self.pickup_spawner {
            self.scheduler.cancel(spawner.timer());
        }

        if let Some(id) = self.coordinator.on_completed(&mut self.scheduler, self.time.tick) {
            self.tasks.insert(id, TimerTask::Transition);
        }
    }
}
