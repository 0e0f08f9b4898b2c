use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every timer state change produces an event.
/// The controller reacts to them; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Started {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero.
    Completed {
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// A new phase was set up, either after a completion was dismissed or
    /// because the running phase was skipped.
    PhaseAdvanced {
        from: Phase,
        to: Phase,
        completed_focus_count: u32,
        duration_secs: u64,
        skipped: bool,
        at: DateTime<Utc>,
    },
}

impl TimerEvent {
    pub fn is_completion(&self) -> bool {
        matches!(self, TimerEvent::Completed { .. })
    }

    /// The new focus count, if this event finished a focus phase.
    pub fn finished_focus_count(&self) -> Option<u32> {
        match self {
            TimerEvent::PhaseAdvanced {
                from: Phase::Focus,
                completed_focus_count,
                ..
            } => Some(*completed_focus_count),
            _ => None,
        }
    }
}
