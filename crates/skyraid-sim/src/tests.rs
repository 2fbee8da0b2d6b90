//! Simulation engine tests.

use skyraid_core::commands::PlayerCommand;
use skyraid_core::config::*;
use skyraid_core::enums::*;
use skyraid_core::events::{GameEvent, ResolutionEvent};
use skyraid_core::state::SessionSnapshot;
use skyraid_core::types::{Position, Velocity};

use crate::bus::LifecycleBus;
use crate::coordinator::{ProgressionCoordinator, SceneRouter, StaticSceneRouter};
use crate::engine::{SessionEngine, SimConfig};
use crate::profile::{
    selected_or_default, JsonFileProfileStore, MemoryProfileStore, ProfileStore,
};
use crate::scenario;
use crate::scheduler::Scheduler;
use crate::tracker::{CompletionCause, CompletionTracker, ScoreState};

// --- Helpers ---

fn make_engine(level: LevelConfig) -> SessionEngine {
    SessionEngine::new(
        SimConfig {
            seed: 7,
            time_scale: 1.0,
        },
        level,
    )
}

fn start(engine: &mut SessionEngine) {
    engine.queue_command(PlayerCommand::StartLevel);
}

/// Run `ticks` ticks, returning the final snapshot.
fn run(engine: &mut SessionEngine, ticks: u64) -> SessionSnapshot {
    let mut last = None;
    for _ in 0..ticks {
        last = Some(engine.tick().unwrap());
    }
    last.expect("ran zero ticks")
}

/// Run `ticks` ticks, accumulating every emitted event.
fn run_collect(engine: &mut SessionEngine, ticks: u64) -> (SessionSnapshot, Vec<GameEvent>) {
    let mut events = Vec::new();
    let mut last = None;
    for _ in 0..ticks {
        let snapshot = engine.tick().unwrap();
        events.extend(snapshot.events.iter().cloned());
        last = Some(snapshot);
    }
    (last.expect("ran zero ticks"), events)
}

fn eliminate_all_active(engine: &mut SessionEngine, snapshot: &SessionSnapshot) {
    for threat in &snapshot.threats {
        if threat.state == ThreatState::Active {
            engine.queue_command(PlayerCommand::EliminateThreat {
                threat_number: threat.threat_number,
            });
        }
    }
}

/// Formation of stationary threats parked mid-field. They never escape
/// on their own, so tests control every resolution.
fn stationary_formation(id: FormationId, count: u32) -> Formation {
    let threats = (0..count)
        .map(|i| ThreatSpec {
            position: Position::new(i as f32 - 2.0, 0.0),
            velocity: Velocity::new(0.0, 0.0),
            template: TemplateId(10),
        })
        .collect();
    Formation { id, threats }
}

/// Minimal level: one stationary formation per wave, no hazards, a
/// weapon pickup template so the pickup spawner has something to do.
fn mini_level(waves: &[(f32, u32)]) -> LevelConfig {
    let formations = waves
        .iter()
        .enumerate()
        .map(|(i, (_, count))| stationary_formation(FormationId(i as u32), *count))
        .collect();
    let waves = waves
        .iter()
        .enumerate()
        .map(|(i, (offset, count))| WaveDescriptor {
            offset_secs: *offset,
            formation: FormationId(i as u32),
            entity_count: *count,
        })
        .collect();

    LevelConfig {
        waves,
        formations,
        pickups: PickupConfig {
            weapon_template: Some(PickupTemplate {
                template: TemplateId(21),
                half_height: 0.4,
            }),
            ..Default::default()
        },
        roster: vec![TemplateId(0), TemplateId(1), TemplateId(2)],
        next_scene: "next_level".to_string(),
        fallback_scene: "menu".to_string(),
        ..Default::default()
    }
}

// --- Scheduler ---

#[test]
fn one_shot_timer_fires_once_at_due_tick() {
    let mut scheduler = Scheduler::new();
    let id = scheduler.after(0, 1.0);
    let mut fired = Vec::new();

    scheduler.poll(29, &mut fired);
    assert!(fired.is_empty());

    scheduler.poll(30, &mut fired);
    assert_eq!(fired, vec![id]);

    scheduler.poll(31, &mut fired);
    assert!(fired.is_empty());
    assert_eq!(scheduler.live_count(), 0);
}

#[test]
fn zero_delay_fires_on_next_tick_not_current() {
    let mut scheduler = Scheduler::new();
    let id = scheduler.after(100, 0.0);
    let mut fired = Vec::new();

    scheduler.poll(100, &mut fired);
    assert!(fired.is_empty());

    scheduler.poll(101, &mut fired);
    assert_eq!(fired, vec![id]);
}

#[test]
fn repeating_timer_fires_every_interval() {
    let mut scheduler = Scheduler::new();
    let id = scheduler.every(0, 2.0);
    let mut fired = Vec::new();
    let mut fire_ticks = Vec::new();

    for now in 0..=240 {
        scheduler.poll(now, &mut fired);
        if !fired.is_empty() {
            assert_eq!(fired, vec![id]);
            fire_ticks.push(now);
        }
    }
    assert_eq!(fire_ticks, vec![60, 120, 180, 240]);
}

#[test]
fn repeating_timer_with_startup_delay() {
    let mut scheduler = Scheduler::new();
    scheduler.every_from(0, 10.0, 2.0);
    let mut fired = Vec::new();

    scheduler.poll(299, &mut fired);
    assert!(fired.is_empty());
    scheduler.poll(300, &mut fired);
    assert_eq!(fired.len(), 1);
    scheduler.poll(360, &mut fired);
    assert_eq!(fired.len(), 1);
}

#[test]
fn due_timers_fire_in_registration_order() {
    let mut scheduler = Scheduler::new();
    let a = scheduler.after(0, 1.0);
    let b = scheduler.every(0, 0.5);
    let c = scheduler.after(0, 0.2);
    let mut fired = Vec::new();

    // All three are due at tick 30; due-tick order would be c, b, a.
    scheduler.poll(30, &mut fired);
    assert_eq!(fired, vec![a, b, c]);
}

#[test]
fn cancel_is_idempotent_and_suppresses_firing() {
    let mut scheduler = Scheduler::new();
    let id = scheduler.every(0, 1.0);
    scheduler.cancel(id);
    scheduler.cancel(id);

    let mut fired = Vec::new();
    scheduler.poll(30, &mut fired);
    assert!(fired.is_empty());
    assert_eq!(scheduler.live_count(), 0);

    // Cancelling after retirement is also a no-op.
    scheduler.cancel(id);
}

#[test]
fn repeating_timer_does_not_double_fire_after_gap() {
    let mut scheduler = Scheduler::new();
    let id = scheduler.every(0, 1.0);
    let mut fired = Vec::new();

    // A poll far past several intervals reports the timer once.
    scheduler.poll(150, &mut fired);
    assert_eq!(fired, vec![id]);
    scheduler.poll(151, &mut fired);
    assert!(fired.is_empty());
}

// --- Lifecycle bus ---

#[test]
fn bus_delivers_to_all_subscribers_in_order() {
    let mut bus = LifecycleBus::new();
    let a = bus.subscribe();
    let b = bus.subscribe();

    let first = ResolutionEvent {
        threat_number: 1,
        kind: ResolutionKind::Eliminated,
    };
    let second = ResolutionEvent {
        threat_number: 2,
        kind: ResolutionKind::Escaped,
    };
    bus.publish(first);
    bus.publish(second);

    assert_eq!(bus.drain(a), vec![first, second]);
    assert_eq!(bus.drain(b), vec![first, second]);
    assert!(bus.drain(a).is_empty());
}

#[test]
fn bus_skips_late_and_removed_subscribers() {
    let mut bus = LifecycleBus::new();
    let early = bus.subscribe();
    bus.publish(ResolutionEvent {
        threat_number: 0,
        kind: ResolutionKind::Eliminated,
    });

    let late = bus.subscribe();
    assert!(bus.drain(late).is_empty());
    assert_eq!(bus.drain(early).len(), 1);

    bus.unsubscribe(early);
    bus.publish(ResolutionEvent {
        threat_number: 1,
        kind: ResolutionKind::Escaped,
    });
    assert!(bus.drain(early).is_empty());
    assert_eq!(bus.subscriber_count(), 1);
}

// --- Completion tracker ---

fn resolution(n: u32) -> ResolutionEvent {
    ResolutionEvent {
        threat_number: n,
        kind: ResolutionKind::Eliminated,
    }
}

#[test]
fn tracker_completes_when_all_waves_and_entities_done() {
    let mut tracker = CompletionTracker::start(2, 0, 300.0, 60.0);
    assert_eq!(tracker.record_wave(2), None);
    assert_eq!(tracker.record_resolution(resolution(0)), None);
    assert_eq!(tracker.record_resolution(resolution(1)), None);
    // All entities resolved, but one wave still pending.
    assert!(!tracker.is_completed());

    assert_eq!(
        tracker.record_wave(0),
        Some(CompletionCause::AllResolved)
    );
    assert!(tracker.is_completed());
}

#[test]
fn tracker_completes_on_final_resolution() {
    let mut tracker = CompletionTracker::start(1, 0, 300.0, 60.0);
    tracker.record_wave(3);
    assert_eq!(tracker.record_resolution(resolution(0)), None);
    assert_eq!(tracker.record_resolution(resolution(1)), None);
    assert_eq!(
        tracker.record_resolution(resolution(2)),
        Some(CompletionCause::AllResolved)
    );
    // A straggler event after completion cannot complete again.
    assert_eq!(tracker.record_resolution(resolution(3)), None);
    assert_eq!(tracker.session().entities_resolved, 4);
}

#[test]
fn tracker_all_zero_entity_waves_never_complete_naturally() {
    let mut tracker = CompletionTracker::start(2, 0, 300.0, 60.0);
    assert_eq!(tracker.record_wave(0), None);
    assert_eq!(tracker.record_wave(0), None);
    assert!(!tracker.is_completed());
}

#[test]
fn tracker_timeout_requires_all_waves_spawned() {
    let mut tracker = CompletionTracker::start(2, 0, 30.0, 60.0);
    tracker.record_wave(1);
    // Overdue, but one wave still pending: no forced completion.
    assert_eq!(tracker.timeout_check(100.0, 0), None);

    tracker.record_wave(1);
    assert_eq!(
        tracker.timeout_check(100.0, 2),
        Some(CompletionCause::MaxDuration)
    );
}

#[test]
fn tracker_quiet_field_needs_grace_and_zero_live() {
    let mut tracker = CompletionTracker::start(1, 0, 300.0, 60.0);
    tracker.record_wave(5);

    assert_eq!(tracker.timeout_check(30.0, 0), None); // too early
    assert_eq!(tracker.timeout_check(70.0, 1), None); // still live threats
    assert_eq!(
        tracker.timeout_check(70.0, 0),
        Some(CompletionCause::QuietField)
    );
}

#[test]
fn tracker_completion_claim_is_single_shot() {
    let mut tracker = CompletionTracker::start(1, 0, 300.0, 60.0);
    tracker.record_wave(0);
    assert_eq!(tracker.force_complete(), Some(CompletionCause::Forced));
    assert_eq!(tracker.force_complete(), None);
    assert_eq!(tracker.timeout_check(1000.0, 0), None);
}

#[test]
fn score_pays_only_for_eliminations() {
    let mut score = ScoreState::default();
    assert!(score.apply(ResolutionKind::Eliminated, 1));
    assert!(!score.apply(ResolutionKind::Escaped, 1));
    assert!(score.apply(ResolutionKind::Eliminated, 1));
    assert_eq!(score.total, 2);
}

// --- Coordinator ---

#[test]
fn coordinator_resolves_next_scene() {
    let mut coordinator =
        ProgressionCoordinator::new("level_2".into(), "menu".into(), 2.0);
    let mut scheduler = Scheduler::new();
    assert!(coordinator.on_completed(&mut scheduler, 0).is_some());
    // Second completion signal does not schedule another transition.
    assert!(coordinator.on_completed(&mut scheduler, 0).is_none());

    let mut router = StaticSceneRouter::new(vec!["level_2".into()]);
    assert_eq!(
        coordinator.fire_transition(&mut router).unwrap(),
        "level_2"
    );
    assert!(coordinator.transition_requested());
}

#[test]
fn coordinator_falls_back_when_next_scene_unknown() {
    let mut coordinator =
        ProgressionCoordinator::new("level_99".into(), "menu".into(), 2.0);
    let mut router = StaticSceneRouter::new(vec!["menu".into()]);
    assert_eq!(coordinator.fire_transition(&mut router).unwrap(), "menu");
}

#[test]
fn coordinator_errors_when_fallback_also_unknown() {
    let mut coordinator =
        ProgressionCoordinator::new("level_99".into(), "nowhere".into(), 2.0);
    let mut router = StaticSceneRouter::new(vec![]);
    let err = coordinator.fire_transition(&mut router).unwrap_err();
    assert!(err.to_string().contains("level_99"));
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn permissive_router_resolves_anything() {
    let mut router = StaticSceneRouter::permissive();
    assert!(router.can_resolve("whatever"));
}

// --- Profile store ---

#[test]
fn profile_defaults_when_absent_or_out_of_range() {
    let empty = MemoryProfileStore::default();
    assert_eq!(selected_or_default(&empty, 3), 0);

    let valid = MemoryProfileStore::with_selected(2);
    assert_eq!(selected_or_default(&valid, 3), 2);

    let stale = MemoryProfileStore::with_selected(9);
    assert_eq!(selected_or_default(&stale, 3), 0);
}

#[test]
fn json_profile_store_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");

    let mut store = JsonFileProfileStore::new(&path);
    assert_eq!(store.load(), None);

    store.save(2).unwrap();
    assert_eq!(store.load(), Some(2));

    // A second store over the same file sees the persisted value.
    let reopened = JsonFileProfileStore::new(&path);
    assert_eq!(reopened.load(), Some(2));
}

#[test]
fn json_profile_store_ignores_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = JsonFileProfileStore::new(&path);
    assert_eq!(store.load(), None);
    assert_eq!(selected_or_default(&store, 3), 0);
}

// --- Engine integration ---

#[test]
fn engine_is_deterministic_for_equal_seeds() {
    let mut a = make_engine(scenario::default_level());
    let mut b = make_engine(scenario::default_level());
    start(&mut a);
    start(&mut b);

    for _ in 0..1500 {
        let sa = a.tick().unwrap();
        let sb = b.tick().unwrap();
        let ja = serde_json::to_string(&sa).unwrap();
        let jb = serde_json::to_string(&sb).unwrap();
        assert_eq!(ja, jb);
    }
}

#[test]
fn start_level_spawns_player_and_first_wave() {
    let mut engine = make_engine(scenario::default_level());
    start(&mut engine);

    // Tick 1 processes the command; the zero-offset wave timer fires on
    // the next tick.
    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.phase, GamePhase::Active);
    assert!(snapshot.player.is_some());
    assert_eq!(snapshot.progress.waves_spawned, 0);

    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.progress.waves_spawned, 1);
    assert_eq!(snapshot.threats.len(), 3);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::WaveSpawned { wave_index: 0, entity_count: 3 })));
}

#[test]
fn waves_fire_at_configured_offsets() {
    let mut engine = make_engine(mini_level(&[(0.0, 1), (2.0, 2), (4.0, 1)]));
    start(&mut engine);

    let snapshot = run(&mut engine, 50);
    assert_eq!(snapshot.progress.waves_spawned, 1);

    let snapshot = run(&mut engine, 40); // past t=2s
    assert_eq!(snapshot.progress.waves_spawned, 2);

    let snapshot = run(&mut engine, 60); // past t=4s
    assert_eq!(snapshot.progress.waves_spawned, 3);
    assert_eq!(snapshot.progress.total_entities_declared, 4);
}

#[test]
fn elimination_resolves_scores_and_despawns() {
    let mut engine = make_engine(mini_level(&[(0.0, 2)]));
    start(&mut engine);
    let snapshot = run(&mut engine, 2);
    assert_eq!(snapshot.threats.len(), 2);

    engine.queue_command(PlayerCommand::EliminateThreat { threat_number: 0 });
    let snapshot = engine.tick().unwrap();

    assert_eq!(snapshot.progress.entities_resolved, 1);
    assert_eq!(snapshot.score.total, 1);
    assert_eq!(snapshot.threats.len(), 1, "resolved threat is despawned");
    assert!(snapshot.events.iter().any(|e| matches!(
        e,
        GameEvent::EntityResolved {
            threat_number: 0,
            kind: ResolutionKind::Eliminated
        }
    )));
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::ScoreChanged { total: 1 })));
}

#[test]
fn eliminating_unknown_threat_is_a_no_op() {
    let mut engine = make_engine(mini_level(&[(0.0, 1)]));
    start(&mut engine);
    run(&mut engine, 2);

    engine.queue_command(PlayerCommand::EliminateThreat { threat_number: 99 });
    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.progress.entities_resolved, 0);
    assert_eq!(snapshot.score.total, 0);

    // Double-eliminating the same threat resolves it exactly once.
    engine.queue_command(PlayerCommand::EliminateThreat { threat_number: 0 });
    engine.queue_command(PlayerCommand::EliminateThreat { threat_number: 0 });
    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.progress.entities_resolved, 1);
}

#[test]
fn escaped_threat_resolves_without_score() {
    // One fast threat diving straight through the field.
    let mut level = mini_level(&[(0.0, 1)]);
    level.formations[0].threats[0].velocity = Velocity::new(0.0, -40.0);

    let mut engine = make_engine(level);
    start(&mut engine);
    let (snapshot, events) = run_collect(&mut engine, 30);

    assert_eq!(snapshot.progress.entities_resolved, 1);
    assert_eq!(snapshot.score.total, 0, "escapes never score");
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::EntityResolved {
            kind: ResolutionKind::Escaped,
            ..
        }
    )));
    // Escape resolves the last declared entity, so the session completes.
    assert!(snapshot.progress.completed);
}

#[test]
fn completion_waits_for_final_wave_spawn() {
    let mut engine = make_engine(mini_level(&[(0.0, 1), (3.0, 1)]));
    start(&mut engine);
    let snapshot = run(&mut engine, 2);

    // Resolve everything currently alive, well before wave 2.
    eliminate_all_active(&mut engine, &snapshot);
    let snapshot = run(&mut engine, 10);
    assert_eq!(snapshot.progress.entities_resolved, 1);
    assert!(
        !snapshot.progress.completed,
        "a pending wave holds completion open"
    );

    // Wave 2 spawns at t=3s; resolving it ends the level.
    let snapshot = run(&mut engine, 90);
    assert_eq!(snapshot.progress.waves_spawned, 2);
    eliminate_all_active(&mut engine, &snapshot);
    let (snapshot, events) = run_collect(&mut engine, 2);
    assert!(snapshot.progress.completed);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelCompleted))
            .count(),
        1
    );
}

#[test]
fn late_zero_entity_wave_can_finish_the_level() {
    // All real entities resolve early; the trailing cosmetic wave is the
    // last condition holding the session open.
    let mut engine = make_engine(mini_level(&[(0.0, 1), (2.0, 0)]));
    start(&mut engine);
    let snapshot = run(&mut engine, 2);
    eliminate_all_active(&mut engine, &snapshot);

    let snapshot = run(&mut engine, 10);
    assert!(!snapshot.progress.completed);

    let (snapshot, events) = run_collect(&mut engine, 60);
    assert_eq!(snapshot.progress.waves_spawned, 2);
    assert!(snapshot.progress.completed, "final wave spawn closes the level");
    assert!(events.iter().any(|e| matches!(e, GameEvent::LevelCompleted)));
}

#[test]
fn max_duration_forces_completion() {
    // Stationary threat that is never resolved; 15s ceiling. The 10s
    // fallback cadence forces completion at the t=20s check.
    let mut level = mini_level(&[(0.0, 1)]);
    level.max_duration_secs = 15.0;

    let mut engine = make_engine(level);
    start(&mut engine);

    let snapshot = run(&mut engine, 450); // t=15s
    assert!(!snapshot.progress.completed);

    let (snapshot, events) = run_collect(&mut engine, 200); // past t=20s
    assert!(snapshot.progress.completed);
    assert!(events.iter().any(|e| matches!(e, GameEvent::LevelCompleted)));
    assert_eq!(snapshot.progress.entities_resolved, 0, "timeout, not resolution");
}

#[test]
fn quiet_field_fallback_catches_mis_declared_waves() {
    // The wave references a formation that does not exist: it degrades to
    // an empty wave, natural completion can never trigger, and the quiet
    // field fallback closes the session after the grace period.
    let mut level = mini_level(&[(0.0, 1)]);
    level.formations.clear();

    let mut engine = make_engine(level);
    start(&mut engine);

    let snapshot = run(&mut engine, 1500); // t=50s
    assert!(!snapshot.progress.completed);
    assert!(
        snapshot
            .alerts
            .is_empty(),
        "unknown-formation alert was emitted at spawn time, not repeatedly"
    );

    let snapshot = run(&mut engine, 800); // past t=60s + check cadence
    assert!(snapshot.progress.completed);
}

#[test]
fn force_complete_requests_transition_after_delay() {
    let mut engine = make_engine(mini_level(&[(0.0, 1)]));
    start(&mut engine);
    run(&mut engine, 5);

    engine.queue_command(PlayerCommand::ForceComplete);
    let (snapshot, events) = run_collect(&mut engine, 90); // past the 2s delay

    assert!(snapshot.progress.completed);
    assert_eq!(snapshot.phase, GamePhase::LevelComplete);
    assert!(events.iter().any(|e| matches!(e, GameEvent::LevelCompleted)));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::TransitionRequested { destination } if destination == "next_level"
    )));

    // A second force is absorbed by the tracker claim.
    engine.queue_command(PlayerCommand::ForceComplete);
    let (_, events) = run_collect(&mut engine, 90);
    assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelCompleted)));
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::TransitionRequested { .. })));
}

#[test]
fn transition_uses_fallback_scene() {
    let router = StaticSceneRouter::new(vec!["menu".into()]);
    let mut engine = SessionEngine::with_deps(
        SimConfig::default(),
        mini_level(&[(0.0, 1)]),
        Box::new(router),
        Box::<MemoryProfileStore>::default(),
    );
    start(&mut engine);
    engine.queue_command(PlayerCommand::ForceComplete);

    let (_, events) = run_collect(&mut engine, 90);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::TransitionRequested { destination } if destination == "menu"
    )));
}

#[test]
fn unroutable_transition_is_fatal() {
    let router = StaticSceneRouter::new(vec![]);
    let mut engine = SessionEngine::with_deps(
        SimConfig::default(),
        mini_level(&[(0.0, 1)]),
        Box::new(router),
        Box::<MemoryProfileStore>::default(),
    );
    start(&mut engine);
    engine.queue_command(PlayerCommand::ForceComplete);

    let mut saw_error = false;
    for _ in 0..90 {
        if engine.tick().is_err() {
            saw_error = true;
            break;
        }
    }
    assert!(saw_error, "unroutable destination must surface an error");
}

#[test]
fn waves_after_completion_are_skipped() {
    let mut engine = make_engine(mini_level(&[(2.0, 3)]));
    start(&mut engine);
    engine.queue_command(PlayerCommand::ForceComplete);

    let snapshot = run(&mut engine, 120); // past the wave offset
    assert_eq!(snapshot.progress.waves_spawned, 0);
    assert!(snapshot.threats.is_empty(), "completed sessions spawn nothing");
}

#[test]
fn pickups_spawn_on_interval_and_stop_at_completion() {
    let mut level = mini_level(&[(0.0, 1)]);
    level.pickups.interval_secs = 2.0;
    level.pickups.health_chance = 0.0; // weapon every time

    let mut engine = make_engine(level);
    start(&mut engine);

    let (_, events) = run_collect(&mut engine, 200); // ~6.6s, 3 intervals
    let spawned = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PickupSpawned { kind: PickupKind::Weapon }))
        .count();
    assert_eq!(spawned, 3);

    engine.queue_command(PlayerCommand::ForceComplete);
    let (_, events) = run_collect(&mut engine, 300);
    assert!(
        !events.iter().any(|e| matches!(e, GameEvent::PickupSpawned { .. })),
        "pickup timer is cancelled at completion"
    );
}

#[test]
fn pickup_honors_health_chance_extremes() {
    let mut level = mini_level(&[(0.0, 1)]);
    level.pickups.interval_secs = 1.0;
    level.pickups.health_chance = 1.0;
    level.pickups.health_template = Some(PickupTemplate {
        template: TemplateId(20),
        half_height: 0.4,
    });

    let mut engine = make_engine(level);
    start(&mut engine);
    let (_, events) = run_collect(&mut engine, 150);

    let kinds: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PickupSpawned { kind } => Some(*kind),
            _ => None,
        })
        .collect();
    assert!(!kinds.is_empty());
    assert!(kinds.iter().all(|k| *k == PickupKind::Health));
}

#[test]
fn pickup_missing_template_degrades_to_alert() {
    // No templates configured at all: every spawn tick degrades.
    let mut level = mini_level(&[(0.0, 1)]);
    level.pickups.interval_secs = 1.0;
    level.pickups.weapon_template = None;

    let mut engine = make_engine(level);
    start(&mut engine);

    let mut alerts = 0;
    let mut spawned = 0;
    for _ in 0..100 {
        let snapshot = engine.tick().unwrap();
        alerts += snapshot.alerts.len();
        spawned += snapshot
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PickupSpawned { .. }))
            .count();
    }
    assert_eq!(spawned, 0);
    assert_eq!(alerts, 3, "one warning per degraded spawn tick");
}

#[test]
fn hazard_pool_cycles_without_repeats() {
    let mut level = mini_level(&[(0.0, 1)]);
    level.hazards = HazardConfig {
        pool: vec![TemplateId(30), TemplateId(31), TemplateId(32)],
        startup_delay_secs: 1.0,
        interval_secs: 1.0,
        speed: 0.8,
    };

    let mut engine = make_engine(level);
    start(&mut engine);
    let (_, events) = run_collect(&mut engine, 200); // ~6 spawns

    let templates: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::HazardSpawned { template } => Some(*template),
            _ => None,
        })
        .collect();
    assert!(templates.len() >= 6);

    // Each full cycle covers the pool before any repeat.
    let first: std::collections::HashSet<_> = templates[0..3].iter().collect();
    let second: std::collections::HashSet<_> = templates[3..6].iter().collect();
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
}

#[test]
fn hazards_keep_spawning_after_completion() {
    let mut level = mini_level(&[(0.0, 1)]);
    level.hazards = HazardConfig {
        pool: vec![TemplateId(30)],
        startup_delay_secs: 1.0,
        interval_secs: 1.0,
        speed: 0.8,
    };

    let mut engine = make_engine(level);
    start(&mut engine);
    engine.queue_command(PlayerCommand::ForceComplete);
    run(&mut engine, 70); // absorb completion + transition

    let (_, events) = run_collect(&mut engine, 100);
    assert!(
        events.iter().any(|e| matches!(e, GameEvent::HazardSpawned { .. })),
        "ambient hazards outlive completion"
    );
}

#[test]
fn empty_hazard_pool_disables_spawner() {
    let mut engine = make_engine(mini_level(&[(0.0, 1)])); // pool empty by default
    start(&mut engine);
    let (snapshot, events) = run_collect(&mut engine, 900);

    assert!(snapshot.hazards.is_empty());
    assert!(!events.iter().any(|e| matches!(e, GameEvent::HazardSpawned { .. })));
}

#[test]
fn pause_freezes_timers_and_time() {
    let mut engine = make_engine(mini_level(&[(0.0, 1), (2.0, 1)]));
    start(&mut engine);
    run(&mut engine, 10);
    let frozen_tick = engine.time().tick;

    engine.queue_command(PlayerCommand::Pause);
    let snapshot = run(&mut engine, 300); // 10s of wall ticks
    assert_eq!(snapshot.phase, GamePhase::Paused);
    assert_eq!(engine.time().tick, frozen_tick);
    assert_eq!(snapshot.progress.waves_spawned, 1, "wave 2 still pending");

    engine.queue_command(PlayerCommand::Resume);
    let snapshot = run(&mut engine, 60);
    assert_eq!(snapshot.phase, GamePhase::Active);
    assert_eq!(snapshot.progress.waves_spawned, 2);
}

#[test]
fn return_to_menu_only_after_completion() {
    let mut engine = make_engine(mini_level(&[(0.0, 1)]));
    start(&mut engine);

    engine.queue_command(PlayerCommand::ReturnToMenu);
    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.phase, GamePhase::Active, "mid-level return is ignored");

    engine.queue_command(PlayerCommand::ForceComplete);
    run(&mut engine, 90);
    engine.queue_command(PlayerCommand::ReturnToMenu);
    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.phase, GamePhase::MainMenu);
}

#[test]
fn restarting_resets_session_state() {
    let mut engine = make_engine(mini_level(&[(0.0, 2)]));
    start(&mut engine);
    let snapshot = run(&mut engine, 2);
    eliminate_all_active(&mut engine, &snapshot);
    run(&mut engine, 90); // complete + transition

    // Back to menu, then a fresh run.
    engine.queue_command(PlayerCommand::ReturnToMenu);
    start(&mut engine);
    let snapshot = run(&mut engine, 3);

    assert_eq!(snapshot.score.total, 0);
    assert_eq!(snapshot.progress.entities_resolved, 0);
    assert!(!snapshot.progress.completed);
    assert_eq!(snapshot.progress.waves_spawned, 1);
    assert_eq!(snapshot.threats.len(), 2);
    // Threat numbering restarts per session.
    assert_eq!(snapshot.threats[0].threat_number, 0);
}

#[test]
fn player_avatar_comes_from_persisted_profile() {
    let mut engine = SessionEngine::with_deps(
        SimConfig::default(),
        mini_level(&[(0.0, 1)]),
        Box::new(StaticSceneRouter::permissive()),
        Box::new(MemoryProfileStore::with_selected(2)),
    );
    start(&mut engine);
    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.player.unwrap().template, TemplateId(2));
}

#[test]
fn out_of_range_profile_falls_back_to_default() {
    let mut engine = SessionEngine::with_deps(
        SimConfig::default(),
        mini_level(&[(0.0, 1)]),
        Box::new(StaticSceneRouter::permissive()),
        Box::new(MemoryProfileStore::with_selected(42)),
    );
    start(&mut engine);
    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.player.unwrap().template, TemplateId(0));
}

#[test]
fn select_profile_applies_to_next_session() {
    let mut engine = make_engine(mini_level(&[(0.0, 1)]));
    engine.queue_command(PlayerCommand::SelectProfile { index: 1 });
    start(&mut engine);
    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.player.unwrap().template, TemplateId(1));
}

#[test]
fn select_profile_rejects_out_of_range_index() {
    let mut engine = make_engine(mini_level(&[(0.0, 1)]));
    engine.queue_command(PlayerCommand::SelectProfile { index: 99 });
    start(&mut engine);
    let snapshot = engine.tick().unwrap();
    assert_eq!(snapshot.player.unwrap().template, TemplateId(0));
}

#[test]
fn unknown_formation_emits_warning_alert() {
    let mut level = mini_level(&[(0.0, 1)]);
    level.formations.clear();

    let mut engine = make_engine(level);
    start(&mut engine);
    let snapshot = run(&mut engine, 2);

    assert_eq!(snapshot.progress.waves_spawned, 1);
    assert_eq!(snapshot.progress.total_entities_declared, 0);
    assert!(snapshot.threats.is_empty());
    assert_eq!(snapshot.alerts.len(), 1);
    assert_eq!(snapshot.alerts[0].level, AlertLevel::Warning);
}

#[test]
fn movement_integrates_velocity() {
    let mut level = mini_level(&[(0.0, 1)]);
    level.formations[0].threats[0].position = Position::new(0.0, 5.0);
    level.formations[0].threats[0].velocity = Velocity::new(0.0, -3.0);

    let mut engine = make_engine(level);
    start(&mut engine);
    run(&mut engine, 2); // spawn tick
    let snapshot = run(&mut engine, 30); // one second of motion

    let threat = &snapshot.threats[0];
    assert!((threat.position.0.y - 2.0).abs() < 0.15);
}

#[test]
fn drifted_pickups_are_cleaned_up() {
    let mut level = mini_level(&[(0.0, 1)]);
    level.pickups.interval_secs = 1.0;
    level.pickups.health_chance = 0.0;
    level.pickups.descent_speed = 30.0; // through the field in under a second

    let mut engine = make_engine(level);
    start(&mut engine);
    let (snapshot, events) = run_collect(&mut engine, 90);

    assert!(events.iter().any(|e| matches!(e, GameEvent::PickupSpawned { .. })));
    // Fast drifters fall past the despawn floor long before 3s elapse.
    assert!(snapshot.pickups.len() <= 1);
}

#[test]
fn saturation_level_runs_to_natural_completion() {
    let mut engine = make_engine(scenario::saturation_level());
    start(&mut engine);

    // Eliminate everything on sight until all five waves have spawned
    // and resolved.
    let mut completed = false;
    for _ in 0..(40 * 30) {
        let snapshot = engine.tick().unwrap();
        eliminate_all_active(&mut engine, &snapshot);
        if snapshot.progress.completed {
            completed = true;
            assert_eq!(snapshot.progress.waves_spawned, 5);
            assert_eq!(
                snapshot.progress.entities_resolved,
                snapshot.progress.total_entities_declared
            );
            break;
        }
    }
    assert!(completed, "all waves resolved should complete within 40s");
}

#[test]
fn staggered_eliminations_complete_on_the_last_one() {
    // One wave of three at t=0; kills land at roughly 1s, 2s, 3s.
    let mut engine = make_engine(mini_level(&[(0.0, 3)]));
    start(&mut engine);

    for (tick_target, threat_number) in [(30u64, 0u32), (60, 1), (90, 2)] {
        while engine.time().tick < tick_target {
            let snapshot = engine.tick().unwrap();
            assert!(!snapshot.progress.completed, "no completion before the last kill");
        }
        engine.queue_command(PlayerCommand::EliminateThreat { threat_number });
    }

    let (snapshot, events) = run_collect(&mut engine, 2);
    assert!(snapshot.progress.completed);
    assert!((snapshot.time.elapsed_secs - 3.0).abs() < 0.1);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelCompleted))
            .count(),
        1
    );
}

#[test]
fn pickup_coin_flip_is_unbiased() {
    use rand::SeedableRng;

    let mut level = mini_level(&[(0.0, 1)]);
    level.pickups.health_chance = 0.3;
    level.pickups.health_template = Some(PickupTemplate {
        template: TemplateId(20),
        half_height: 0.4,
    });

    let mut spawner = {
        let mut scheduler = Scheduler::new();
        crate::systems::pickup_spawner::PickupSpawner::schedule(
            &level.pickups,
            &mut scheduler,
            0,
        )
    };
    let mut world = hecs::World::new();
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    let tracker = CompletionTracker::start(1, 0, 300.0, 60.0);
    let mut events = Vec::new();
    let mut alerts = Vec::new();

    for _ in 0..10_000 {
        spawner.on_tick(&mut world, &mut rng, &level, &tracker, &mut events, &mut alerts, 0);
    }

    let health = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PickupSpawned { kind: PickupKind::Health }))
        .count();
    let fraction = health as f64 / 10_000.0;
    assert!(
        (fraction - 0.3).abs() < 0.02,
        "health fraction {fraction} drifted from configured 0.3"
    );
    assert!(alerts.is_empty());
}

#[test]
fn snapshot_serializes_to_json() {
    let mut engine = make_engine(scenario::default_level());
    start(&mut engine);
    let snapshot = run(&mut engine, 5);

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"phase\""));
    let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.time.tick, snapshot.time.tick);
}
