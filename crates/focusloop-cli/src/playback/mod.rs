//! Playback runtimes for the terminal.

mod console;
#[cfg(feature = "rodio")]
mod speaker;

pub use console::ConsoleRuntime;
#[cfg(feature = "rodio")]
pub use speaker::SpeakerRuntime;

use focusloop_core::{Config, PlaybackRuntime, ScriptedRuntime};

/// Pick the runtime for `focusloop run`.
///
/// `--dry-run` tracks handles without output or call history. With the
/// `rodio` feature the default output device is used when it can be opened;
/// otherwise playback is only logged.
pub fn select(config: &Config, dry_run: bool) -> Box<dyn PlaybackRuntime> {
    if dry_run {
        return Box::new(ScriptedRuntime::quiet());
    }

    #[cfg(feature = "rodio")]
    match SpeakerRuntime::open(config.clone()) {
        Ok(speaker) => return Box::new(speaker),
        Err(e) => tracing::warn!("audio output unavailable, logging playback instead: {e}"),
    }

    Box::new(ConsoleRuntime::new(config.clone()))
}
