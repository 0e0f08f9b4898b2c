//! Partial settings edits and their field-by-field validation.
//!
//! A patch is merged field by field: every valid field is applied, every
//! invalid field keeps its previous value and is reported back.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use super::model::TimerSettings;
use crate::catalog::Catalog;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingField {
    PomodoroMinutes,
    ShortBreakMinutes,
    LongBreakMinutes,
    SoundEnabled,
    Volume,
    RecitationVolume,
    ActiveAmbientTrackIds,
    PlayDuringBreaks,
    RecitationReciterId,
    RecitationTrackId,
    AutoAdvanceRecitation,
}

impl SettingField {
    pub const ALL: [SettingField; 11] = [
        SettingField::PomodoroMinutes,
        SettingField::ShortBreakMinutes,
        SettingField::LongBreakMinutes,
        SettingField::SoundEnabled,
        SettingField::Volume,
        SettingField::RecitationVolume,
        SettingField::ActiveAmbientTrackIds,
        SettingField::PlayDuringBreaks,
        SettingField::RecitationReciterId,
        SettingField::RecitationTrackId,
        SettingField::AutoAdvanceRecitation,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SettingField::PomodoroMinutes => "pomodoro_minutes",
            SettingField::ShortBreakMinutes => "short_break_minutes",
            SettingField::LongBreakMinutes => "long_break_minutes",
            SettingField::SoundEnabled => "sound_enabled",
            SettingField::Volume => "volume",
            SettingField::RecitationVolume => "recitation_volume",
            SettingField::ActiveAmbientTrackIds => "active_ambient_track_ids",
            SettingField::PlayDuringBreaks => "play_during_breaks",
            SettingField::RecitationReciterId => "recitation_reciter_id",
            SettingField::RecitationTrackId => "recitation_track_id",
            SettingField::AutoAdvanceRecitation => "auto_advance_recitation",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn is_duration(self) -> bool {
        matches!(
            self,
            SettingField::PomodoroMinutes
                | SettingField::ShortBreakMinutes
                | SettingField::LongBreakMinutes
        )
    }
}

/// A partial edit. `None` leaves a field untouched; for the nullable
/// recitation ids, `Some(None)` clears the selection.
///
/// Numbers are carried as `i64` so out-of-range input reaches validation
/// instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub pomodoro_minutes: Option<i64>,
    pub short_break_minutes: Option<i64>,
    pub long_break_minutes: Option<i64>,
    pub sound_enabled: Option<bool>,
    pub volume: Option<i64>,
    pub recitation_volume: Option<i64>,
    pub active_ambient_track_ids: Option<BTreeSet<String>>,
    pub play_during_breaks: Option<bool>,
    #[serde(deserialize_with = "double_option")]
    pub recitation_reciter_id: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub recitation_track_id: Option<Option<String>>,
    pub auto_advance_recitation: Option<bool>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field.
fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Patch that overwrites every field with `settings`.
    pub fn from_settings(settings: &TimerSettings) -> Self {
        Self {
            pomodoro_minutes: Some(settings.pomodoro_minutes.into()),
            short_break_minutes: Some(settings.short_break_minutes.into()),
            long_break_minutes: Some(settings.long_break_minutes.into()),
            sound_enabled: Some(settings.sound_enabled),
            volume: Some(settings.volume.into()),
            recitation_volume: Some(settings.recitation_volume.into()),
            active_ambient_track_ids: Some(settings.active_ambient_track_ids.clone()),
            play_during_breaks: Some(settings.play_during_breaks),
            recitation_reciter_id: Some(settings.recitation_reciter_id.clone()),
            recitation_track_id: Some(settings.recitation_track_id.clone()),
            auto_advance_recitation: Some(settings.auto_advance_recitation),
        }
    }

    /// Parse a single textual edit such as `volume=55` or
    /// `active_ambient_track_ids=rain,fire`.
    ///
    /// Lists are comma separated. `none` or an empty value clears a
    /// recitation id.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self, ValidationError> {
        let field =
            SettingField::from_key(key).ok_or_else(|| ValidationError::UnknownKey(key.into()))?;
        let value = value.trim();
        let mut patch = Self::default();
        match field {
            SettingField::PomodoroMinutes => patch.pomodoro_minutes = Some(parse_int(field, value)?),
            SettingField::ShortBreakMinutes => {
                patch.short_break_minutes = Some(parse_int(field, value)?)
            }
            SettingField::LongBreakMinutes => {
                patch.long_break_minutes = Some(parse_int(field, value)?)
            }
            SettingField::Volume => patch.volume = Some(parse_int(field, value)?),
            SettingField::RecitationVolume => {
                patch.recitation_volume = Some(parse_int(field, value)?)
            }
            SettingField::SoundEnabled => patch.sound_enabled = Some(parse_bool(field, value)?),
            SettingField::PlayDuringBreaks => {
                patch.play_during_breaks = Some(parse_bool(field, value)?)
            }
            SettingField::AutoAdvanceRecitation => {
                patch.auto_advance_recitation = Some(parse_bool(field, value)?)
            }
            SettingField::ActiveAmbientTrackIds => {
                patch.active_ambient_track_ids = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(String::from)
                        .collect(),
                )
            }
            SettingField::RecitationReciterId => {
                patch.recitation_reciter_id = Some(parse_nullable(value))
            }
            SettingField::RecitationTrackId => {
                patch.recitation_track_id = Some(parse_nullable(value))
            }
        }
        Ok(patch)
    }

    /// Merge onto `current`, validating each field against `catalog`.
    pub fn apply_to(&self, current: &TimerSettings, catalog: &Catalog) -> (TimerSettings, UpdateOutcome) {
        let mut next = current.clone();
        let mut outcome = UpdateOutcome::default();

        merge(&mut outcome, SettingField::PomodoroMinutes, self.pomodoro_minutes, |v| {
            next.pomodoro_minutes = minutes(SettingField::PomodoroMinutes, v)?;
            Ok(())
        });
        merge(&mut outcome, SettingField::ShortBreakMinutes, self.short_break_minutes, |v| {
            next.short_break_minutes = minutes(SettingField::ShortBreakMinutes, v)?;
            Ok(())
        });
        merge(&mut outcome, SettingField::LongBreakMinutes, self.long_break_minutes, |v| {
            next.long_break_minutes = minutes(SettingField::LongBreakMinutes, v)?;
            Ok(())
        });
        merge(&mut outcome, SettingField::SoundEnabled, self.sound_enabled, |v| {
            next.sound_enabled = v;
            Ok(())
        });
        merge(&mut outcome, SettingField::Volume, self.volume, |v| {
            next.volume = percent(SettingField::Volume, v)?;
            Ok(())
        });
        merge(&mut outcome, SettingField::RecitationVolume, self.recitation_volume, |v| {
            next.recitation_volume = percent(SettingField::RecitationVolume, v)?;
            Ok(())
        });
        merge(
            &mut outcome,
            SettingField::ActiveAmbientTrackIds,
            self.active_ambient_track_ids.clone(),
            |ids| {
                if let Some(unknown) = ids.iter().find(|id| catalog.ambient_track(id).is_none()) {
                    return Err(ValidationError::UnknownId {
                        kind: "ambient track",
                        id: unknown.clone(),
                    });
                }
                next.active_ambient_track_ids = ids;
                Ok(())
            },
        );
        merge(&mut outcome, SettingField::PlayDuringBreaks, self.play_during_breaks, |v| {
            next.play_during_breaks = v;
            Ok(())
        });
        merge(
            &mut outcome,
            SettingField::RecitationReciterId,
            self.recitation_reciter_id.clone(),
            |id| {
                if let Some(id) = &id {
                    if catalog.reciter(id).is_none() {
                        return Err(ValidationError::UnknownId {
                            kind: "reciter",
                            id: id.clone(),
                        });
                    }
                }
                next.recitation_reciter_id = id;
                Ok(())
            },
        );
        merge(
            &mut outcome,
            SettingField::RecitationTrackId,
            self.recitation_track_id.clone(),
            |id| {
                if let Some(id) = &id {
                    if catalog.recitation_track(id).is_none() {
                        return Err(ValidationError::UnknownId {
                            kind: "recitation track",
                            id: id.clone(),
                        });
                    }
                }
                next.recitation_track_id = id;
                Ok(())
            },
        );
        merge(
            &mut outcome,
            SettingField::AutoAdvanceRecitation,
            self.auto_advance_recitation,
            |v| {
                next.auto_advance_recitation = v;
                Ok(())
            },
        );

        (next, outcome)
    }
}

/// Result of merging a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// Fields that were present and valid.
    pub applied: Vec<SettingField>,
    /// Fields that were present but invalid; their previous value was kept.
    pub rejected: Vec<FieldRejection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRejection {
    pub field: SettingField,
    #[serde(serialize_with = "serialize_display")]
    pub error: ValidationError,
}

fn serialize_display<S: serde::Serializer>(
    error: &ValidationError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl UpdateOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn touched(&self, field: SettingField) -> bool {
        self.applied.contains(&field)
    }

    pub fn touched_durations(&self) -> bool {
        self.applied.iter().any(|f| f.is_duration())
    }
}

fn merge<T>(
    outcome: &mut UpdateOutcome,
    field: SettingField,
    value: Option<T>,
    apply: impl FnOnce(T) -> Result<(), ValidationError>,
) {
    let Some(value) = value else {
        return;
    };
    match apply(value) {
        Ok(()) => outcome.applied.push(field),
        Err(error) => outcome.rejected.push(FieldRejection { field, error }),
    }
}

fn minutes(field: SettingField, value: i64) -> Result<u32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveDuration { field: field.key() });
    }
    u32::try_from(value).map_err(|_| ValidationError::InvalidValue {
        field: field.key().into(),
        message: format!("{value} minutes is too large"),
    })
}

fn percent(field: SettingField, value: i64) -> Result<u8, ValidationError> {
    if !(0..=100).contains(&value) {
        return Err(ValidationError::VolumeOutOfRange {
            field: field.key(),
            value,
        });
    }
    Ok(value as u8)
}

fn parse_int(field: SettingField, value: &str) -> Result<i64, ValidationError> {
    value.parse().map_err(|_| ValidationError::InvalidValue {
        field: field.key().into(),
        message: format!("cannot parse '{value}' as an integer"),
    })
}

fn parse_bool(field: SettingField, value: &str) -> Result<bool, ValidationError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ValidationError::InvalidValue {
            field: field.key().into(),
            message: format!("cannot parse '{value}' as a boolean"),
        }),
    }
}

fn parse_nullable(value: &str) -> Option<String> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value.to_string())
    }
}
