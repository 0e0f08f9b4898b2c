//! Real output through the default audio device.
//!
//! Only local files are played; locators are resolved against
//! `[audio] assets_dir`. Remote locators are refused, which the audio
//! engine treats like any other refused start and retries on every
//! reconcile.
//!
//! The built-in catalog points most ambient tracks (all but `waterfall`
//! and `night`) and every recitation track at HTTPS URLs, so with it this
//! runtime plays little beyond those two loops and the alert. To hear the
//! rest, download the files and name them in a catalog file
//! (`[catalog] path`) with locators relative to `assets_dir`.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use focusloop_core::audio::{gain, HandleId, StreamParams};
use focusloop_core::{Config, PlaybackError, PlaybackRuntime};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

struct Voice {
    sink: Sink,
    params: StreamParams,
}

pub struct SpeakerRuntime {
    // Dropping the stream silences every sink.
    _stream: OutputStream,
    output: OutputStreamHandle,
    config: Config,
    next_handle: u64,
    voices: HashMap<HandleId, Voice>,
    one_shots: Vec<Sink>,
}

impl SpeakerRuntime {
    pub fn open(config: Config) -> Result<Self, PlaybackError> {
        let (stream, output) = OutputStream::try_default()
            .map_err(|e| PlaybackError::Device(format!("failed to open audio output: {e}")))?;
        Ok(Self {
            _stream: stream,
            output,
            config,
            next_handle: 0,
            voices: HashMap::new(),
            one_shots: Vec::new(),
        })
    }

    fn local_path(&self, source: &str) -> Result<PathBuf, PlaybackError> {
        let resolved = self.config.resolve_asset(source);
        if resolved.contains("://") {
            return Err(PlaybackError::UnsupportedSource(source.to_string()));
        }
        Ok(PathBuf::from(resolved))
    }

    fn sink_for(&self, source: &str, looping: bool, volume: u8) -> Result<Sink, PlaybackError> {
        let path = self.local_path(source)?;
        let blocked = |reason: String| PlaybackError::Blocked {
            locator: source.to_string(),
            reason,
        };

        let file = File::open(&path).map_err(|e| blocked(format!("{}: {e}", path.display())))?;
        let reader = BufReader::new(file);
        let sink = Sink::try_new(&self.output)
            .map_err(|e| PlaybackError::Device(format!("failed to create sink: {e}")))?;

        if looping {
            let decoder = Decoder::new_looped(reader).map_err(|e| blocked(e.to_string()))?;
            sink.append(decoder);
        } else {
            let decoder = Decoder::new(reader).map_err(|e| blocked(e.to_string()))?;
            sink.append(decoder);
        }
        sink.set_volume(gain(volume));
        Ok(sink)
    }
}

impl PlaybackRuntime for SpeakerRuntime {
    fn create(&mut self, params: &StreamParams) -> Result<HandleId, PlaybackError> {
        let sink = self.sink_for(&params.source, params.looping, params.volume)?;
        self.next_handle += 1;
        let handle = HandleId(self.next_handle);
        self.voices.insert(
            handle,
            Voice {
                sink,
                params: params.clone(),
            },
        );
        Ok(handle)
    }

    fn set_volume(&mut self, handle: HandleId, volume: u8) {
        if let Some(voice) = self.voices.get_mut(&handle) {
            voice.sink.set_volume(gain(volume));
            voice.params.volume = volume;
        }
    }

    /// A decoder cannot switch between looping and one-pass, so the sink is
    /// rebuilt from the start of the file under the same handle.
    fn set_looping(&mut self, handle: HandleId, looping: bool) {
        let Some(voice) = self.voices.get(&handle) else {
            return;
        };
        let (source, volume) = (voice.params.source.clone(), voice.params.volume);
        match self.sink_for(&source, looping, volume) {
            Ok(sink) => {
                if let Some(voice) = self.voices.get_mut(&handle) {
                    voice.sink.stop();
                    voice.sink = sink;
                    voice.params.looping = looping;
                }
            }
            Err(e) => tracing::warn!(handle = handle.0, "could not change loop mode: {e}"),
        }
    }

    fn destroy(&mut self, handle: HandleId) {
        if let Some(voice) = self.voices.remove(&handle) {
            voice.sink.stop();
        }
    }

    fn play_once(&mut self, source: &str, volume: u8) -> Result<(), PlaybackError> {
        self.one_shots.retain(|sink| !sink.empty());
        let sink = self.sink_for(source, false, volume)?;
        self.one_shots.push(sink);
        Ok(())
    }

    fn take_finished(&mut self) -> Vec<HandleId> {
        let finished: Vec<HandleId> = self
            .voices
            .iter()
            .filter(|(_, voice)| !voice.params.looping && voice.sink.empty())
            .map(|(handle, _)| *handle)
            .collect();
        for handle in &finished {
            self.voices.remove(handle);
        }
        finished
    }
}
