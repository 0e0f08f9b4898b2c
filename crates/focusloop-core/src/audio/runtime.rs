use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// Opaque id of a live playback handle, unique per runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(pub u64);

/// What a handle plays and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamParams {
    pub source: String,
    pub looping: bool,
    /// Percent, 0..=100.
    pub volume: u8,
}

/// Host audio capability.
///
/// Calls must not block. A handle created here keeps playing until
/// [`destroy`](PlaybackRuntime::destroy)ed; a non-looping handle that
/// reaches its end is reported once through
/// [`take_finished`](PlaybackRuntime::take_finished).
pub trait PlaybackRuntime {
    /// Create a handle and start playing it.
    fn create(&mut self, params: &StreamParams) -> Result<HandleId, PlaybackError>;

    fn set_volume(&mut self, handle: HandleId, volume: u8);

    fn set_looping(&mut self, handle: HandleId, looping: bool);

    /// Stop and release a handle. Unknown handles are ignored.
    fn destroy(&mut self, handle: HandleId);

    /// Fire-and-forget one-shot sound that owns no handle.
    fn play_once(&mut self, source: &str, volume: u8) -> Result<(), PlaybackError>;

    /// Handles that finished naturally since the last call.
    fn take_finished(&mut self) -> Vec<HandleId>;
}

impl<R: PlaybackRuntime + ?Sized> PlaybackRuntime for Box<R> {
    fn create(&mut self, params: &StreamParams) -> Result<HandleId, PlaybackError> {
        (**self).create(params)
    }

    fn set_volume(&mut self, handle: HandleId, volume: u8) {
        (**self).set_volume(handle, volume)
    }

    fn set_looping(&mut self, handle: HandleId, looping: bool) {
        (**self).set_looping(handle, looping)
    }

    fn destroy(&mut self, handle: HandleId) {
        (**self).destroy(handle)
    }

    fn play_once(&mut self, source: &str, volume: u8) -> Result<(), PlaybackError> {
        (**self).play_once(source, volume)
    }

    fn take_finished(&mut self) -> Vec<HandleId> {
        (**self).take_finished()
    }
}

/// Convert a percent volume to a linear gain.
pub fn gain(volume: u8) -> f32 {
    f32::from(volume.min(100)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_is_linear_and_capped() {
        assert_eq!(gain(0), 0.0);
        assert_eq!(gain(40), 0.4);
        assert_eq!(gain(100), 1.0);
        assert_eq!(gain(250), 1.0);
    }
}
