use serde::{Deserialize, Serialize};

/// Every `LONG_BREAK_INTERVAL`-th completed focus phase is followed by a
/// long break instead of a short one.
pub const LONG_BREAK_INTERVAL: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Focus)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Running,
    Paused,
    Completed,
}

impl Status {
    /// Label for the primary timer button in this status.
    pub fn action_label(self, phase: Phase) -> &'static str {
        match self {
            Status::Idle => "Start",
            Status::Running => "Pause",
            Status::Paused => "Continue",
            Status::Completed if phase == Phase::Focus => "Start Break",
            Status::Completed => "Start Focus",
        }
    }
}

/// Configured phase lengths in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub focus_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
}

impl PhaseDurations {
    pub fn minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_min,
            Phase::ShortBreak => self.short_break_min,
            Phase::LongBreak => self.long_break_min,
        }
    }

    pub fn seconds(&self, phase: Phase) -> u64 {
        u64::from(self.minutes(phase)) * 60
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            focus_min: 25,
            short_break_min: 5,
            long_break_min: 15,
        }
    }
}

/// Phase that follows `current`. `completed_focus_count` is the count
/// *after* the current phase has been accounted for.
pub fn next_phase(current: Phase, completed_focus_count: u32) -> Phase {
    match current {
        Phase::Focus if completed_focus_count % LONG_BREAK_INTERVAL == 0 => Phase::LongBreak,
        Phase::Focus => Phase::ShortBreak,
        Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
    }
}
