//! Timer state machine.
//!
//! The machine is clock-based and has no internal thread - the caller is
//! responsible for calling `tick()` about once per second while the timer
//! is running (see [`TimerMachine::is_ticking`]). Each tick flushes the
//! clock time elapsed since the previous flush, so late or throttled ticks
//! do not drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!        Completed --start()--> (next phase, Idle)
//!
//! skip() from Running/Paused -> (next phase, Idle)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = TimerMachine::new(PhaseDurations::default(), SystemClock::new());
//! timer.start();
//! // Once per second while timer.is_ticking():
//! if let Some(event) = timer.tick() { /* completion */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::phase::{next_phase, Phase, PhaseDurations, Status, LONG_BREAK_INTERVAL};
use crate::events::TimerEvent;

/// Read-only view of the timer for the UI and the audio engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub status: Status,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub completed_focus_count: u32,
}

impl TimerSnapshot {
    /// `remaining / total`, 1.0 at the start of a phase and 0.0 at the end.
    pub fn progress_ratio(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        self.remaining_seconds as f64 / self.total_seconds as f64
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        let mins = self.remaining_seconds / 60;
        let secs = self.remaining_seconds % 60;
        format!("{mins:02}:{secs:02}")
    }

    /// 1-based position of the current focus phase within its cycle.
    pub fn cycle_position(&self) -> u32 {
        self.completed_focus_count % LONG_BREAK_INTERVAL + 1
    }
}

/// Core timer state machine.
///
/// Invalid commands for the current status are no-ops that return `None`.
#[derive(Debug, Clone)]
pub struct TimerMachine<C: Clock = SystemClock> {
    clock: C,
    durations: PhaseDurations,
    phase: Phase,
    status: Status,
    /// Remaining time in milliseconds for the current phase.
    remaining_ms: u64,
    total_secs: u64,
    completed_focus_count: u32,
    /// Clock reading at the last flush. `Some` exactly while the tick source
    /// is active, i.e. while `status == Running`.
    last_flush_ms: Option<u64>,
}

impl<C: Clock> TimerMachine<C> {
    /// Create a machine in `(Focus, Idle)` with a full focus countdown.
    pub fn new(durations: PhaseDurations, clock: C) -> Self {
        let total_secs = durations.seconds(Phase::Focus);
        Self {
            clock,
            durations,
            phase: Phase::Focus,
            status: Status::Idle,
            remaining_ms: total_secs * 1000,
            total_secs,
            completed_focus_count: 0,
            last_flush_ms: None,
        }
    }

    /// Restore a persisted focus count.
    pub fn with_completed_focus_count(mut self, count: u32) -> Self {
        self.completed_focus_count = count;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Whole seconds left, rounded up so a fresh phase reads its full length.
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_secs
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.completed_focus_count
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    /// Whether a tick source should currently exist.
    pub fn is_ticking(&self) -> bool {
        self.last_flush_ms.is_some()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            status: self.status,
            remaining_seconds: self.remaining_seconds(),
            total_seconds: self.total_secs,
            completed_focus_count: self.completed_focus_count,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<TimerEvent> {
        match self.status {
            Status::Idle => {
                self.begin_ticking();
                Some(TimerEvent::Started {
                    phase: self.phase,
                    duration_secs: self.total_secs,
                    at: Utc::now(),
                })
            }
            Status::Paused => {
                self.begin_ticking();
                Some(TimerEvent::Resumed {
                    phase: self.phase,
                    remaining_secs: self.remaining_seconds(),
                    at: Utc::now(),
                })
            }
            // Dismiss the completion and set up the next phase without
            // starting it.
            Status::Completed => Some(self.advance_phase(false)),
            Status::Running => None,
        }
    }

    pub fn pause(&mut self) -> Option<TimerEvent> {
        if self.status != Status::Running {
            return None;
        }
        self.flush_elapsed();
        if self.remaining_ms == 0 {
            return self.complete();
        }
        self.status = Status::Paused;
        self.last_flush_ms = None;
        Some(TimerEvent::Paused {
            phase: self.phase,
            remaining_secs: self.remaining_seconds(),
            at: Utc::now(),
        })
    }

    pub fn skip(&mut self) -> Option<TimerEvent> {
        match self.status {
            Status::Running | Status::Paused => {
                self.last_flush_ms = None;
                Some(self.advance_phase(true))
            }
            Status::Idle | Status::Completed => None,
        }
    }

    /// Call periodically. Returns `Some(TimerEvent::Completed)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.status != Status::Running {
            return None;
        }
        self.flush_elapsed();
        if self.remaining_ms == 0 {
            return self.complete();
        }
        None
    }

    /// Apply new phase lengths. An idle phase is re-initialized with the new
    /// length; a started phase keeps its countdown and the new lengths apply
    /// from the next phase on.
    pub fn set_durations(&mut self, durations: PhaseDurations) {
        self.durations = durations;
        if self.status == Status::Idle {
            self.total_secs = durations.seconds(self.phase);
            self.remaining_ms = self.total_secs * 1000;
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_ticking(&mut self) {
        self.status = Status::Running;
        self.last_flush_ms = Some(self.clock.now_ms());
    }

    fn flush_elapsed(&mut self) {
        if let Some(last) = self.last_flush_ms {
            let now = self.clock.now_ms();
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_flush_ms = Some(now);
        }
    }

    fn complete(&mut self) -> Option<TimerEvent> {
        self.last_flush_ms = None;
        self.remaining_ms = 0;
        self.status = Status::Completed;
        tracing::info!(phase = ?self.phase, "timer phase completed");
        Some(TimerEvent::Completed {
            phase: self.phase,
            at: Utc::now(),
        })
    }

    fn advance_phase(&mut self, skipped: bool) -> TimerEvent {
        let from = self.phase;
        if from == Phase::Focus {
            self.completed_focus_count = self.completed_focus_count.saturating_add(1);
        }
        let to = next_phase(from, self.completed_focus_count);

        self.phase = to;
        self.total_secs = self.durations.seconds(to);
        self.remaining_ms = self.total_secs * 1000;
        self.status = Status::Idle;
        self.last_flush_ms = None;

        tracing::info!(
            ?from,
            ?to,
            skipped,
            completed_focus_count = self.completed_focus_count,
            "timer phase advanced"
        );

        TimerEvent::PhaseAdvanced {
            from,
            to,
            completed_focus_count: self.completed_focus_count,
            duration_secs: self.total_secs,
            skipped,
            at: Utc::now(),
        }
    }
}
