use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::patch::SettingField;
use crate::catalog::Catalog;
use crate::timer::PhaseDurations;

const DEFAULT_AMBIENT: [&str; 2] = ["birds", "waterfall"];
const DEFAULT_RECITER: &str = "qtm";
const DEFAULT_RECITATION_TRACK: &str = "002";

/// User-editable timer and audio preferences.
///
/// Instances held by a [`SettingsStore`](super::SettingsStore) are always
/// valid against its catalog; edits go through [`SettingsPatch`](super::SettingsPatch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub pomodoro_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Master switch for looping audio; also mutes the completion alert.
    pub sound_enabled: bool,
    pub volume: u8,
    pub recitation_volume: u8,
    pub active_ambient_track_ids: BTreeSet<String>,
    pub play_during_breaks: bool,
    pub recitation_reciter_id: Option<String>,
    pub recitation_track_id: Option<String>,
    pub auto_advance_recitation: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            pomodoro_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sound_enabled: true,
            volume: 40,
            recitation_volume: 80,
            active_ambient_track_ids: DEFAULT_AMBIENT.iter().map(|id| id.to_string()).collect(),
            play_during_breaks: false,
            recitation_reciter_id: Some(DEFAULT_RECITER.into()),
            recitation_track_id: Some(DEFAULT_RECITATION_TRACK.into()),
            auto_advance_recitation: false,
        }
    }
}

impl TimerSettings {
    /// Defaults restricted to ids that exist in `catalog`. If none of the
    /// default ambient tracks exist, the catalog's first ambient track is
    /// used instead.
    pub fn defaults_for(catalog: &Catalog) -> Self {
        let mut settings = Self::default();

        settings
            .active_ambient_track_ids
            .retain(|id| catalog.ambient_track(id).is_some());
        if settings.active_ambient_track_ids.is_empty() {
            if let Some(first) = catalog.ambient.first() {
                settings.active_ambient_track_ids.insert(first.id.clone());
            }
        }

        if catalog.reciter(DEFAULT_RECITER).is_none() {
            settings.recitation_reciter_id = catalog.reciters.first().map(|r| r.id.clone());
        }
        if catalog.recitation_track(DEFAULT_RECITATION_TRACK).is_none() {
            settings.recitation_track_id =
                catalog.recitation_tracks.first().map(|t| t.id.clone());
        }
        settings
    }

    pub fn durations(&self) -> PhaseDurations {
        PhaseDurations {
            focus_min: self.pomodoro_minutes,
            short_break_min: self.short_break_minutes,
            long_break_min: self.long_break_minutes,
        }
    }

    /// Recitation is configured when both ids are chosen.
    pub fn recitation_selected(&self) -> bool {
        self.recitation_reciter_id.is_some() && self.recitation_track_id.is_some()
    }

    /// Textual value of one field, in the format `SettingsPatch::from_key_value` accepts.
    pub fn get(&self, field: SettingField) -> String {
        match field {
            SettingField::PomodoroMinutes => self.pomodoro_minutes.to_string(),
            SettingField::ShortBreakMinutes => self.short_break_minutes.to_string(),
            SettingField::LongBreakMinutes => self.long_break_minutes.to_string(),
            SettingField::SoundEnabled => self.sound_enabled.to_string(),
            SettingField::Volume => self.volume.to_string(),
            SettingField::RecitationVolume => self.recitation_volume.to_string(),
            SettingField::ActiveAmbientTrackIds => self
                .active_ambient_track_ids
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(","),
            SettingField::PlayDuringBreaks => self.play_during_breaks.to_string(),
            SettingField::RecitationReciterId => {
                self.recitation_reciter_id.clone().unwrap_or_else(|| "none".into())
            }
            SettingField::RecitationTrackId => {
                self.recitation_track_id.clone().unwrap_or_else(|| "none".into())
            }
            SettingField::AutoAdvanceRecitation => self.auto_advance_recitation.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AmbientTrack, Catalog};

    #[test]
    fn builtin_defaults_are_unchanged() {
        let settings = TimerSettings::defaults_for(&Catalog::builtin());
        assert_eq!(settings, TimerSettings::default());
        assert_eq!(settings.durations(), PhaseDurations::default());
    }

    #[test]
    fn defaults_fall_back_to_catalog_entries() {
        let catalog = Catalog {
            ambient: vec![AmbientTrack {
                id: "hum".into(),
                display_name: "Hum".into(),
                source: "hum.ogg".into(),
            }],
            reciters: vec![],
            recitation_tracks: vec![],
        };
        let settings = TimerSettings::defaults_for(&catalog);
        assert_eq!(
            settings.active_ambient_track_ids.iter().collect::<Vec<_>>(),
            vec!["hum"]
        );
        assert_eq!(settings.recitation_reciter_id, None);
        assert_eq!(settings.recitation_track_id, None);
        assert!(!settings.recitation_selected());
    }

    #[test]
    fn get_formats_fields() {
        let settings = TimerSettings::default();
        assert_eq!(settings.get(SettingField::ActiveAmbientTrackIds), "birds,waterfall");
        assert_eq!(settings.get(SettingField::Volume), "40");
        assert_eq!(settings.get(SettingField::RecitationTrackId), "002");
    }
}
