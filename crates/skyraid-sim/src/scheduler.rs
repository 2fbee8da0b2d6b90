//! Cooperative timer scheduler — the spawn timer primitive.
//!
//! Everything time-driven in a session (waves, pickups, hazards, the
//! completion timeout check, the post-completion transition delay) runs
//! off this scheduler. Timers live in the tick domain: a delay in
//! seconds is converted once at registration and fires when the session
//! clock reaches the due tick.
//!
//! Ordering guarantee: within one `poll`, all due timers are reported in
//! registration order. The engine dispatches them one at a time, so a
//! handler's state updates are visible to the next due handler in the
//! same tick.

use skyraid_core::types::secs_to_ticks;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct TimerEntry {
    id: TimerId,
    due_tick: u64,
    /// Repeat interval in ticks; `None` for one-shot timers.
    interval: Option<u64>,
    cancelled: bool,
}

/// Timer scheduler for one session. Registration order is preserved.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<TimerEntry>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer that fires once `delay_secs` after `now`.
    /// A zero or negative delay fires on the next tick, never within the
    /// current one, so same-tick registration order stays meaningful.
    pub fn after(&mut self, now: u64, delay_secs: f32) -> TimerId {
        let delay = secs_to_ticks(delay_secs).max(1);
        self.push(now + delay, None)
    }

    /// Schedule a repeating timer: first fire at `interval_secs` after
    /// `now`, then every `interval_secs` thereafter until cancelled.
    pub fn every(&mut self, now: u64, interval_secs: f32) -> TimerId {
        self.every_from(now, interval_secs, interval_secs)
    }

    /// Schedule a repeating timer with a distinct startup delay: first
    /// fire at `delay_secs` after `now`, then every `interval_secs`.
    pub fn every_from(&mut self, now: u64, delay_secs: f32, interval_secs: f32) -> TimerId {
        let delay = secs_to_ticks(delay_secs).max(1);
        let interval = secs_to_ticks(interval_secs).max(1);
        self.push(now + delay, Some(interval))
    }

    /// Cancel a timer. Idempotent: cancelling a timer that already fired
    /// (one-shot) or was already cancelled is a no-op.
    pub fn cancel(&mut self, id: TimerId) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.cancelled = true;
        }
    }

    /// Collect all timers due at `now` into `fired`, in registration
    /// order. One-shot timers are retired; repeating timers advance by
    /// whole intervals. Cancelled entries are dropped without firing.
    pub fn poll(&mut self, now: u64, fired: &mut Vec<TimerId>) {
        fired.clear();
        for entry in &mut self.entries {
            if entry.cancelled {
                continue;
            }
            if entry.due_tick <= now {
                fired.push(entry.id);
                match entry.interval {
                    Some(interval) => {
                        // Catch up past skipped ticks without firing twice
                        // in the same poll.
                        while entry.due_tick <= now {
                            entry.due_tick += interval;
                        }
                    }
                    None => entry.cancelled = true,
                }
            }
        }
        self.entries.retain(|e| !e.cancelled);
    }

    /// Number of live (not yet cancelled/retired) timers.
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.cancelled).count()
    }

    fn push(&mut self, due_tick: u64, interval: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            due_tick,
            interval,
            cancelled: false,
        });
        id
    }
}
