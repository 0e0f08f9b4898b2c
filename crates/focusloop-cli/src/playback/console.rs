use std::collections::HashMap;

use focusloop_core::audio::{HandleId, StreamParams};
use focusloop_core::{Config, PlaybackError, PlaybackRuntime};

/// Logs what would play. Nothing ever finishes on its own.
pub struct ConsoleRuntime {
    config: Config,
    next_handle: u64,
    live: HashMap<HandleId, StreamParams>,
}

impl ConsoleRuntime {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            next_handle: 0,
            live: HashMap::new(),
        }
    }
}

impl PlaybackRuntime for ConsoleRuntime {
    fn create(&mut self, params: &StreamParams) -> Result<HandleId, PlaybackError> {
        self.next_handle += 1;
        let handle = HandleId(self.next_handle);
        tracing::info!(
            handle = handle.0,
            source = %self.config.resolve_asset(&params.source),
            looping = params.looping,
            volume = params.volume,
            "play"
        );
        self.live.insert(handle, params.clone());
        Ok(handle)
    }

    fn set_volume(&mut self, handle: HandleId, volume: u8) {
        if let Some(params) = self.live.get_mut(&handle) {
            params.volume = volume;
            tracing::info!(handle = handle.0, volume, "volume");
        }
    }

    fn set_looping(&mut self, handle: HandleId, looping: bool) {
        if let Some(params) = self.live.get_mut(&handle) {
            params.looping = looping;
            tracing::info!(handle = handle.0, looping, "loop");
        }
    }

    fn destroy(&mut self, handle: HandleId) {
        if let Some(params) = self.live.remove(&handle) {
            tracing::info!(handle = handle.0, source = %params.source, "stop");
        }
    }

    fn play_once(&mut self, source: &str, volume: u8) -> Result<(), PlaybackError> {
        tracing::info!(source = %self.config.resolve_asset(source), volume, "alert");
        Ok(())
    }

    fn take_finished(&mut self) -> Vec<HandleId> {
        Vec::new()
    }
}
