mod clock;
mod engine;
mod phase;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{TimerMachine, TimerSnapshot};
pub use phase::{next_phase, Phase, PhaseDurations, Status, LONG_BREAK_INTERVAL};
