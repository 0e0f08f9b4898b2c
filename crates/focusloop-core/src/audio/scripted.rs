//! In-process playback runtime that plays nothing and records everything.
//!
//! Used by tests and by dry runs. Sources can be marked as blocked to
//! simulate a host that refuses to start audio, and handles can be marked
//! finished to simulate a track reaching its end.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::runtime::{HandleId, PlaybackRuntime, StreamParams};
use crate::error::PlaybackError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum PlaybackCall {
    Create { handle: HandleId, params: StreamParams },
    Rejected { source: String },
    SetVolume { handle: HandleId, volume: u8 },
    SetLooping { handle: HandleId, looping: bool },
    Destroy { handle: HandleId },
    PlayOnce { source: String, volume: u8 },
}

#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    next_handle: u64,
    live: BTreeMap<HandleId, StreamParams>,
    calls: Vec<PlaybackCall>,
    blocked: HashSet<String>,
    block_all: bool,
    /// Skip the call history; live handles are still tracked.
    quiet: bool,
    finished: Vec<HandleId>,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime that keeps no call history, for long-running dry runs.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    /// Refuse to start `source` until unblocked.
    pub fn block_source(&mut self, source: impl Into<String>) {
        self.blocked.insert(source.into());
    }

    pub fn unblock_source(&mut self, source: &str) {
        self.blocked.remove(source);
    }

    /// Refuse every start, like a host awaiting its first user gesture.
    pub fn set_block_all(&mut self, block: bool) {
        self.block_all = block;
    }

    /// Simulate `handle` reaching its end. Looping handles never finish,
    /// so this is ignored for them.
    pub fn finish(&mut self, handle: HandleId) {
        if let Some(params) = self.live.get(&handle) {
            if !params.looping {
                self.finished.push(handle);
            }
        }
    }

    pub fn calls(&self) -> &[PlaybackCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<PlaybackCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn live(&self) -> &BTreeMap<HandleId, StreamParams> {
        &self.live
    }

    pub fn is_live(&self, handle: HandleId) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn handle_for_source(&self, source: &str) -> Option<HandleId> {
        self.live
            .iter()
            .find(|(_, params)| params.source == source)
            .map(|(handle, _)| *handle)
    }

    /// Sources of one-shot sounds played so far.
    pub fn one_shots(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PlaybackCall::PlayOnce { source, .. } => Some(source.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: PlaybackCall) {
        if !self.quiet {
            self.calls.push(call);
        }
    }

    fn is_blocked(&self, source: &str) -> bool {
        self.block_all || self.blocked.contains(source)
    }

    fn rejection(&mut self, source: &str) -> PlaybackError {
        self.record(PlaybackCall::Rejected {
            source: source.to_string(),
        });
        PlaybackError::Blocked {
            locator: source.to_string(),
            reason: "playback not allowed before user interaction".into(),
        }
    }
}

impl PlaybackRuntime for ScriptedRuntime {
    fn create(&mut self, params: &StreamParams) -> Result<HandleId, PlaybackError> {
        if self.is_blocked(&params.source) {
            return Err(self.rejection(&params.source));
        }
        self.next_handle += 1;
        let handle = HandleId(self.next_handle);
        self.live.insert(handle, params.clone());
        self.record(PlaybackCall::Create {
            handle,
            params: params.clone(),
        });
        Ok(handle)
    }

    fn set_volume(&mut self, handle: HandleId, volume: u8) {
        if let Some(params) = self.live.get_mut(&handle) {
            params.volume = volume;
            self.record(PlaybackCall::SetVolume { handle, volume });
        }
    }

    fn set_looping(&mut self, handle: HandleId, looping: bool) {
        if let Some(params) = self.live.get_mut(&handle) {
            params.looping = looping;
            self.record(PlaybackCall::SetLooping { handle, looping });
        }
    }

    fn destroy(&mut self, handle: HandleId) {
        if self.live.remove(&handle).is_some() {
            self.finished.retain(|h| *h != handle);
            self.record(PlaybackCall::Destroy { handle });
        }
    }

    fn play_once(&mut self, source: &str, volume: u8) -> Result<(), PlaybackError> {
        if self.is_blocked(source) {
            return Err(self.rejection(source));
        }
        self.record(PlaybackCall::PlayOnce {
            source: source.to_string(),
            volume,
        });
        Ok(())
    }

    fn take_finished(&mut self) -> Vec<HandleId> {
        std::mem::take(&mut self.finished)
    }
}
