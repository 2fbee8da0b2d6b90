//! Game loop thread — runs the session engine at 30Hz and emits snapshots.
//!
//! Commands arrive via `mpsc` channel; snapshots leave the same way. The
//! engine is moved into the thread, so the loop owns all simulation state.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use tracing::error;

use skyraid_core::commands::PlayerCommand;
use skyraid_core::constants::TICK_RATE;
use skyraid_core::state::SessionSnapshot;
use skyraid_sim::engine::SessionEngine;

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Commands sent from the outside to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the session engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender. The loop exits when it receives
/// `Shutdown`, when either channel disconnects, or on a fatal engine
/// error.
pub fn spawn_game_loop(
    engine: SessionEngine,
    snapshot_tx: mpsc::Sender<SessionSnapshot>,
) -> mpsc::Sender<GameLoopCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("skyraid-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, snapshot_tx);
        })
        .expect("Failed to spawn game loop thread");

    cmd_tx
}

fn run_game_loop(
    mut engine: SessionEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snapshot_tx: mpsc::Sender<SessionSnapshot>,
) {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = match engine.tick() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(%err, "fatal session error, stopping game loop");
                return;
            }
        };

        // 3. Emit the snapshot; a closed receiver means the app is done
        if snapshot_tx.send(snapshot).is_err() {
            return;
        }

        // 4. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind — reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}
