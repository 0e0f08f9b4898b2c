use serde::Serialize;
use std::collections::BTreeMap;

use super::runtime::StreamParams;
use crate::catalog::Catalog;
use crate::settings::TimerSettings;
use crate::timer::{Status, TimerSnapshot};

/// Identity of a looping stream. There is at most one recitation stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum StreamKey {
    Ambient(String),
    Recitation,
}

/// Whether looping audio of any kind may play.
pub fn audio_gate(timer: &TimerSnapshot, settings: &TimerSettings) -> bool {
    settings.sound_enabled
        && timer.status == Status::Running
        && (!timer.phase.is_break() || settings.play_during_breaks)
}

/// The complete set of streams that should be live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredPlayback {
    pub streams: BTreeMap<StreamKey, StreamParams>,
}

impl DesiredPlayback {
    pub fn contains(&self, key: &StreamKey) -> bool {
        self.streams.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

pub fn desired_playback(
    timer: &TimerSnapshot,
    settings: &TimerSettings,
    catalog: &Catalog,
) -> DesiredPlayback {
    let mut desired = DesiredPlayback::default();
    if !audio_gate(timer, settings) {
        return desired;
    }

    for id in &settings.active_ambient_track_ids {
        if let Some(track) = catalog.ambient_track(id) {
            desired.streams.insert(
                StreamKey::Ambient(id.clone()),
                StreamParams {
                    source: track.source.clone(),
                    looping: true,
                    volume: settings.volume,
                },
            );
        }
    }

    if let (Some(reciter), Some(track)) = (
        settings.recitation_reciter_id.as_deref(),
        settings.recitation_track_id.as_deref(),
    ) {
        if let Some(source) = catalog.recitation_source(reciter, track) {
            desired.streams.insert(
                StreamKey::Recitation,
                StreamParams {
                    source,
                    looping: !settings.auto_advance_recitation,
                    volume: settings.recitation_volume,
                },
            );
        }
    }

    desired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Phase;

    fn running(phase: Phase) -> TimerSnapshot {
        TimerSnapshot {
            phase,
            status: Status::Running,
            remaining_seconds: 60,
            total_seconds: 60,
            completed_focus_count: 0,
        }
    }

    #[test]
    fn gate_requires_sound_running_and_focus_or_break_opt_in() {
        let mut settings = TimerSettings::default();
        assert!(audio_gate(&running(Phase::Focus), &settings));
        assert!(!audio_gate(&running(Phase::ShortBreak), &settings));
        assert!(!audio_gate(&running(Phase::LongBreak), &settings));

        settings.play_during_breaks = true;
        assert!(audio_gate(&running(Phase::ShortBreak), &settings));

        settings.sound_enabled = false;
        assert!(!audio_gate(&running(Phase::Focus), &settings));

        settings.sound_enabled = true;
        for status in [Status::Idle, Status::Paused, Status::Completed] {
            let timer = TimerSnapshot {
                status,
                ..running(Phase::Focus)
            };
            assert!(!audio_gate(&timer, &settings));
        }
    }

    #[test]
    fn desired_set_covers_ambient_and_recitation() {
        let settings = TimerSettings::default();
        let desired = desired_playback(&running(Phase::Focus), &settings, &Catalog::builtin());
        assert!(desired.contains(&StreamKey::Ambient("birds".into())));
        assert!(desired.contains(&StreamKey::Ambient("waterfall".into())));
        let recitation = &desired.streams[&StreamKey::Recitation];
        assert_eq!(recitation.source, "https://server6.mp3quran.net/qtm/002.mp3");
        assert!(recitation.looping);
        assert_eq!(recitation.volume, 80);
        assert!(desired.streams[&StreamKey::Ambient("birds".into())].looping);
    }

    #[test]
    fn recitation_needs_both_ids_and_auto_advance_disables_loop() {
        let mut settings = TimerSettings {
            auto_advance_recitation: true,
            ..TimerSettings::default()
        };
        let catalog = Catalog::builtin();
        let desired = desired_playback(&running(Phase::Focus), &settings, &catalog);
        assert!(!desired.streams[&StreamKey::Recitation].looping);

        settings.recitation_track_id = None;
        let desired = desired_playback(&running(Phase::Focus), &settings, &catalog);
        assert!(!desired.contains(&StreamKey::Recitation));
        assert_eq!(desired.streams.len(), 2);
    }
}
