//! Standalone headless run: plays one level to completion and logs the
//! progression event stream.
//!
//! Environment knobs:
//!   SKYRAID_LEVEL        "default" or "saturation"
//!   SKYRAID_SEED         RNG seed (u64)
//!   SKYRAID_PROFILE_PATH JSON file for the persisted profile selection

use std::sync::mpsc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skyraid_app::game_loop::{self, GameLoopCommand};
use skyraid_core::commands::PlayerCommand;
use skyraid_core::events::GameEvent;
use skyraid_sim::coordinator::StaticSceneRouter;
use skyraid_sim::engine::{SessionEngine, SimConfig};
use skyraid_sim::profile::{JsonFileProfileStore, MemoryProfileStore, ProfileStore};
use skyraid_sim::scenario;

fn main() {
    init_tracing();

    let level = match std::env::var("SKYRAID_LEVEL").as_deref() {
        Ok("saturation") => scenario::saturation_level(),
        _ => scenario::default_level(),
    };
    let seed = std::env::var("SKYRAID_SEED")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(42);
    let profiles: Box<dyn ProfileStore> = match std::env::var("SKYRAID_PROFILE_PATH") {
        Ok(path) => Box::new(JsonFileProfileStore::new(path)),
        Err(_) => Box::<MemoryProfileStore>::default(),
    };

    let engine = SessionEngine::with_deps(
        SimConfig {
            seed,
            time_scale: 1.0,
        },
        level,
        Box::new(StaticSceneRouter::permissive()),
        profiles,
    );

    let (snapshot_tx, snapshot_rx) = mpsc::channel();
    let cmd_tx = game_loop::spawn_game_loop(engine, snapshot_tx);
    cmd_tx
        .send(GameLoopCommand::PlayerCommand(PlayerCommand::StartLevel))
        .expect("game loop exited before start");

    for snapshot in snapshot_rx {
        for alert in &snapshot.alerts {
            warn!(level = ?alert.level, tick = alert.tick, "{}", alert.message);
        }
        let mut done = false;
        for event in &snapshot.events {
            match event {
                GameEvent::WaveSpawned {
                    wave_index,
                    entity_count,
                } => info!(wave_index, entity_count, "wave spawned"),
                GameEvent::EntityResolved {
                    threat_number,
                    kind,
                } => info!(threat_number, ?kind, "threat resolved"),
                GameEvent::ScoreChanged { total } => info!(total, "score"),
                GameEvent::PickupSpawned { kind } => info!(?kind, "pickup spawned"),
                GameEvent::HazardSpawned { template } => info!(template, "hazard spawned"),
                GameEvent::LevelCompleted => info!(
                    elapsed_secs = snapshot.time.elapsed_secs,
                    score = snapshot.score.total,
                    "level completed"
                ),
                GameEvent::TransitionRequested { destination } => {
                    info!(%destination, "transition requested, shutting down");
                    done = true;
                }
            }
        }
        if done {
            let _ = cmd_tx.send(GameLoopCommand::Shutdown);
            break;
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
