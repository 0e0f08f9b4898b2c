//! Owned registry of live playback handles.
//!
//! All handle creation and destruction goes through `ensure` and `release`,
//! keyed by stream identity. A handle is bound to one source for its whole
//! life: a source change destroys it and creates a new one.

use std::collections::BTreeMap;

use super::desired::StreamKey;
use super::runtime::{HandleId, PlaybackRuntime, StreamParams};
use crate::error::PlaybackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Already live with identical parameters; no runtime call was made.
    Unchanged,
    /// Volume or loop flag changed in place.
    Updated,
    /// A new handle was created.
    Started,
    /// The source changed; the old handle was destroyed and a new one created.
    Restarted,
}

#[derive(Debug, Clone)]
struct LiveStream {
    handle: HandleId,
    params: StreamParams,
}

#[derive(Debug, Default)]
pub struct StreamRegistry {
    live: BTreeMap<StreamKey, LiveStream>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `key` live with `params`, doing as little as possible.
    pub fn ensure<R: PlaybackRuntime + ?Sized>(
        &mut self,
        key: StreamKey,
        params: StreamParams,
        runtime: &mut R,
    ) -> Result<EnsureOutcome, PlaybackError> {
        if let Some(live) = self.live.get_mut(&key) {
            if live.params.source == params.source {
                let mut outcome = EnsureOutcome::Unchanged;
                if live.params.volume != params.volume {
                    runtime.set_volume(live.handle, params.volume);
                    outcome = EnsureOutcome::Updated;
                }
                if live.params.looping != params.looping {
                    runtime.set_looping(live.handle, params.looping);
                    outcome = EnsureOutcome::Updated;
                }
                live.params = params;
                return Ok(outcome);
            }
        }

        let restarted = match self.live.remove(&key) {
            Some(old) => {
                runtime.destroy(old.handle);
                true
            }
            None => false,
        };

        let handle = runtime.create(&params)?;
        self.live.insert(key, LiveStream { handle, params });
        Ok(if restarted {
            EnsureOutcome::Restarted
        } else {
            EnsureOutcome::Started
        })
    }

    /// Destroy the handle for `key`. Returns whether one was live.
    pub fn release<R: PlaybackRuntime + ?Sized>(&mut self, key: &StreamKey, runtime: &mut R) -> bool {
        match self.live.remove(key) {
            Some(live) => {
                runtime.destroy(live.handle);
                true
            }
            None => false,
        }
    }

    /// Destroy every live handle. Returns how many there were.
    pub fn release_all<R: PlaybackRuntime + ?Sized>(&mut self, runtime: &mut R) -> usize {
        let live = std::mem::take(&mut self.live);
        for stream in live.values() {
            runtime.destroy(stream.handle);
        }
        live.len()
    }

    pub fn handle(&self, key: &StreamKey) -> Option<HandleId> {
        self.live.get(key).map(|live| live.handle)
    }

    pub fn key_for(&self, handle: HandleId) -> Option<&StreamKey> {
        self.live
            .iter()
            .find(|(_, live)| live.handle == handle)
            .map(|(key, _)| key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &StreamKey> {
        self.live.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
