//! Audio playback driven by timer and settings state.
//!
//! Looping audio (ambient tracks plus one recitation stream) is never
//! started or stopped directly. Callers trigger [`AudioEngine::reconcile`]
//! whenever timer or settings state changes; the engine computes the
//! playback set that state calls for and applies the difference to the
//! live handles it owns.

mod alert;
mod desired;
mod engine;
mod registry;
mod runtime;
mod scripted;

pub use alert::CompletionNotifier;
pub use desired::{audio_gate, desired_playback, DesiredPlayback, StreamKey};
pub use engine::{AudioEngine, ReconcileReport, StreamFailure};
pub use registry::{EnsureOutcome, StreamRegistry};
pub use runtime::{gain, HandleId, PlaybackRuntime, StreamParams};
pub use scripted::{PlaybackCall, ScriptedRuntime};
