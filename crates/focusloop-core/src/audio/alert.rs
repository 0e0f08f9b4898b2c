use super::runtime::PlaybackRuntime;
use crate::settings::TimerSettings;

/// Plays the one-shot sound when a phase runs out.
#[derive(Debug, Clone)]
pub struct CompletionNotifier {
    alert_source: String,
}

impl CompletionNotifier {
    pub fn new(alert_source: impl Into<String>) -> Self {
        Self {
            alert_source: alert_source.into(),
        }
    }

    pub fn alert_source(&self) -> &str {
        &self.alert_source
    }

    /// Play the alert at `settings.volume` if sound is enabled.
    /// Phase and `play_during_breaks` do not matter here.
    ///
    /// Returns whether the runtime accepted the sound. Refusals are logged.
    pub fn notify<R: PlaybackRuntime + ?Sized>(&self, settings: &TimerSettings, runtime: &mut R) -> bool {
        if !settings.sound_enabled {
            return false;
        }
        match runtime.play_once(&self.alert_source, settings.volume) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, "completion alert not played");
                false
            }
        }
    }
}
