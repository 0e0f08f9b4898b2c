//! # focusloop Core Library
//!
//! This library provides the focus-session logic behind focusloop: a
//! Pomodoro-style countdown with work/break phases, and the layered audio
//! (ambient loops plus a recitation stream) that accompanies it.
//!
//! ## Architecture
//!
//! - **Timer**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for progress updates
//! - **Settings**: Validated, persisted user preferences with per-field merge
//! - **Audio**: Diff-based reconciliation of live playback handles against
//!   the playback set the current timer and settings call for
//! - **Storage**: SQLite key-value persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerMachine`]: Core timer state machine
//! - [`SettingsStore`]: Settings validation and persistence
//! - [`AudioEngine`]: Playback reconciliation
//! - [`FocusController`]: Wires the above together for a UI layer

pub mod audio;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod events;
pub mod settings;
pub mod storage;
pub mod timer;

pub use audio::{AudioEngine, CompletionNotifier, PlaybackRuntime, ScriptedRuntime};
pub use catalog::Catalog;
pub use controller::FocusController;
pub use error::{CatalogError, ConfigError, CoreError, PlaybackError, StorageError, ValidationError};
pub use events::TimerEvent;
pub use settings::{SettingsPatch, SettingsStore, TimerSettings, UpdateOutcome};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, UnavailableStore};
pub use timer::{Clock, ManualClock, Phase, Status, SystemClock, TimerMachine, TimerSnapshot};
