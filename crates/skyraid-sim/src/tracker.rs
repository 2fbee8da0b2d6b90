//! Completion tracker — the level session state machine.
//!
//! Aggregates wave counts and resolution events and decides when the
//! level is complete. `Running → Completed` is the only transition and
//! it is terminal. All completion paths (natural, timeout fallback,
//! manual force) go through the single `claim` guard, so the completion
//! notification can fire at most once per session.

use skyraid_core::enums::ResolutionKind;
use skyraid_core::events::ResolutionEvent;

/// Per-level spawn/resolution bookkeeping. Owned exclusively by the
/// tracker; mutated only through its operations.
#[derive(Debug, Clone, Default)]
pub struct SpawnSession {
    pub total_waves_declared: u32,
    pub waves_spawned: u32,
    pub total_entities_declared: u32,
    pub entities_resolved: u32,
    pub started_tick: u64,
    pub completed: bool,
}

/// How a completed session reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCause {
    /// All declared waves spawned and all declared entities resolved.
    AllResolved,
    /// Elapsed time exceeded the configured maximum.
    MaxDuration,
    /// All waves spawned, grace period elapsed, zero live threats.
    QuietField,
    /// Manual diagnostic trigger.
    Forced,
}

/// The completion state machine.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    session: SpawnSession,
    max_duration_secs: f32,
    quiet_grace_secs: f32,
}

impl CompletionTracker {
    /// Start tracking a fresh session.
    pub fn start(
        total_waves: u32,
        started_tick: u64,
        max_duration_secs: f32,
        quiet_grace_secs: f32,
    ) -> Self {
        Self {
            session: SpawnSession {
                total_waves_declared: total_waves,
                started_tick,
                ..Default::default()
            },
            max_duration_secs,
            quiet_grace_secs,
        }
    }

    pub fn session(&self) -> &SpawnSession {
        &self.session
    }

    pub fn is_completed(&self) -> bool {
        self.session.completed
    }

    /// Record a spawned wave and its declared entity count. Both counters
    /// move together; the single-timeline scheduler guarantees no
    /// resolution event interleaves mid-update. Returns the completion
    /// cause if this wave satisfied the exit condition (a late wave can
    /// finish a level whose entities all resolved early).
    pub fn record_wave(&mut self, entity_count: u32) -> Option<CompletionCause> {
        if self.session.completed {
            return None;
        }
        self.session.waves_spawned += 1;
        self.session.total_entities_declared += entity_count;
        self.try_natural_completion()
    }

    /// Record one resolution event and re-evaluate the exit condition.
    pub fn record_resolution(&mut self, _event: ResolutionEvent) -> Option<CompletionCause> {
        // Late events after completion still count, they just can't
        // complete the session a second time.
        self.session.entities_resolved += 1;
        self.try_natural_completion()
    }

    /// Periodic timeout fallback. Forces completion when all waves have
    /// spawned and either the level overran its configured maximum, or
    /// the field has been quiet past the grace period (a safety net for
    /// mis-declared wave entity counts).
    pub fn timeout_check(&mut self, elapsed_secs: f64, live_threats: u32) -> Option<CompletionCause> {
        if self.session.waves_spawned < self.session.total_waves_declared {
            return None;
        }
        if elapsed_secs > self.max_duration_secs as f64 {
            return self.claim(CompletionCause::MaxDuration);
        }
        if elapsed_secs >= self.quiet_grace_secs as f64 && live_threats == 0 {
            return self.claim(CompletionCause::QuietField);
        }
        None
    }

    /// Manual completion trigger. Same terminal path, idempotent.
    pub fn force_complete(&mut self) -> Option<CompletionCause> {
        self.claim(CompletionCause::Forced)
    }

    fn try_natural_completion(&mut self) -> Option<CompletionCause> {
        let s = &self.session;
        if s.total_entities_declared > 0
            && s.entities_resolved >= s.total_entities_declared
            && s.waves_spawned >= s.total_waves_declared
        {
            self.claim(CompletionCause::AllResolved)
        } else {
            None
        }
    }

    /// The atomic completion claim: only the caller that flips
    /// `Running → Completed` gets a cause back and may fire the
    /// completion notification.
    fn claim(&mut self, cause: CompletionCause) -> Option<CompletionCause> {
        if self.session.completed {
            None
        } else {
            self.session.completed = true;
            Some(cause)
        }
    }
}

/// Running score state tracked by the engine.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub total: u32,
}

impl ScoreState {
    /// Apply one resolution to the score. Only eliminations pay out.
    pub fn apply(&mut self, kind: ResolutionKind, points: u32) -> bool {
        match kind {
            ResolutionKind::Eliminated => {
                self.total += points;
                true
            }
            ResolutionKind::Escaped => false,
        }
    }
}
