//! Settings store: current settings, validation and persistence.
//!
//! Persistence failures never fail an edit. The first failure switches
//! the store to in-memory mode for the rest of the session and leaves a
//! single warning for the UI to collect.

use std::sync::Arc;

use super::model::TimerSettings;
use super::patch::{SettingsPatch, UpdateOutcome};
use crate::catalog::Catalog;
use crate::error::StorageError;
use crate::storage::KeyValueStore;

pub const SETTINGS_KEY: &str = "timer_settings";
pub const FOCUS_COUNT_KEY: &str = "completed_focus_count";

pub struct SettingsStore<S: KeyValueStore = Box<dyn KeyValueStore>> {
    backend: S,
    catalog: Arc<Catalog>,
    settings: TimerSettings,
    completed_focus_count: u32,
    /// Set on the first storage failure; no further reads or writes are attempted.
    degraded: bool,
    pending_warning: Option<String>,
}

impl<S: KeyValueStore> SettingsStore<S> {
    /// Load persisted settings and focus count from `backend`, falling back
    /// to catalog-aware defaults. Persisted fields that no longer validate
    /// are replaced by their default value.
    pub fn open(backend: S, catalog: Arc<Catalog>) -> Self {
        let mut store = Self {
            settings: TimerSettings::defaults_for(&catalog),
            backend,
            catalog,
            completed_focus_count: 0,
            degraded: false,
            pending_warning: None,
        };
        store.load_settings();
        store.load_focus_count();
        store
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.completed_focus_count
    }

    /// Whether edits currently reach durable storage.
    pub fn is_persistent(&self) -> bool {
        !self.degraded
    }

    /// The persistence warning, returned once.
    pub fn take_persistence_warning(&mut self) -> Option<String> {
        self.pending_warning.take()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Merge `patch` field by field. Valid fields apply and persist
    /// immediately; invalid fields keep their prior value.
    pub fn update(&mut self, patch: &SettingsPatch) -> UpdateOutcome {
        let (next, outcome) = patch.apply_to(&self.settings, &self.catalog);
        for rejection in &outcome.rejected {
            tracing::debug!(
                field = rejection.field.key(),
                error = %rejection.error,
                "setting rejected"
            );
        }
        if next != self.settings {
            self.settings = next;
            self.persist_settings();
        }
        outcome
    }

    /// Restore defaults and persist them.
    pub fn reset(&mut self) {
        self.settings = TimerSettings::defaults_for(&self.catalog);
        self.persist_settings();
    }

    /// Add or remove one ambient track. Once the new set is accepted, sound
    /// turns on if there is anything left to play.
    pub fn toggle_ambient_track(&mut self, id: &str) -> UpdateOutcome {
        let mut ids = self.settings.active_ambient_track_ids.clone();
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
        let mut outcome = self.update(&SettingsPatch {
            active_ambient_track_ids: Some(ids),
            ..Default::default()
        });

        let has_audio = !self.settings.active_ambient_track_ids.is_empty()
            || self.settings.recitation_selected();
        if outcome.is_clean() && has_audio && !self.settings.sound_enabled {
            let enable = self.update(&SettingsPatch {
                sound_enabled: Some(true),
                ..Default::default()
            });
            outcome.applied.extend(enable.applied);
        }
        outcome
    }

    /// Choose a reciter and turn sound on.
    pub fn select_reciter(&mut self, id: &str) -> UpdateOutcome {
        self.select(SettingsPatch {
            recitation_reciter_id: Some(Some(id.to_string())),
            ..Default::default()
        })
    }

    /// Choose a recitation track and turn sound on.
    pub fn select_recitation_track(&mut self, id: &str) -> UpdateOutcome {
        self.select(SettingsPatch {
            recitation_track_id: Some(Some(id.to_string())),
            ..Default::default()
        })
    }

    pub fn record_completed_focus_count(&mut self, count: u32) {
        if count == self.completed_focus_count {
            return;
        }
        self.completed_focus_count = count;
        self.write(FOCUS_COUNT_KEY, &count.to_string());
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Sound is only switched on if the selection itself was accepted.
    fn select(&mut self, patch: SettingsPatch) -> UpdateOutcome {
        let mut outcome = self.update(&patch);
        if outcome.is_clean() && !self.settings.sound_enabled {
            let enable = self.update(&SettingsPatch {
                sound_enabled: Some(true),
                ..Default::default()
            });
            outcome.applied.extend(enable.applied);
        }
        outcome
    }

    fn load_settings(&mut self) {
        let Some(raw) = self.read(SETTINGS_KEY) else {
            return;
        };
        match serde_json::from_str::<SettingsPatch>(&raw) {
            Ok(saved) => {
                let (settings, outcome) = saved.apply_to(&self.settings, &self.catalog);
                for rejection in &outcome.rejected {
                    tracing::warn!(
                        field = rejection.field.key(),
                        error = %rejection.error,
                        "persisted setting no longer valid, using default"
                    );
                }
                self.settings = settings;
            }
            Err(e) => tracing::warn!("ignoring unreadable persisted settings: {e}"),
        }
    }

    fn load_focus_count(&mut self) {
        let Some(raw) = self.read(FOCUS_COUNT_KEY) else {
            return;
        };
        match raw.trim().parse::<u32>() {
            Ok(count) => self.completed_focus_count = count,
            Err(e) => tracing::warn!("ignoring unreadable focus count '{raw}': {e}"),
        }
    }

    fn persist_settings(&mut self) {
        match serde_json::to_string(&self.settings) {
            Ok(json) => self.write(SETTINGS_KEY, &json),
            Err(e) => tracing::error!("failed to serialize settings: {e}"),
        }
    }

    fn read(&mut self, key: &str) -> Option<String> {
        if self.degraded {
            return None;
        }
        match self.backend.load(key) {
            Ok(value) => value,
            Err(e) => {
                self.degrade(e);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if self.degraded {
            return;
        }
        if let Err(e) = self.backend.save(key, value) {
            self.degrade(e);
        }
    }

    fn degrade(&mut self, error: StorageError) {
        self.degraded = true;
        let message = format!("settings will not be saved this session: {error}");
        tracing::warn!("{message}");
        self.pending_warning = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingField;
    use crate::storage::{MemoryStore, UnavailableStore};
    use std::cell::Cell;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::builtin())
    }

    /// Shares a MemoryStore between two SettingsStore instances.
    struct Shared<'a>(&'a MemoryStore);

    impl KeyValueStore for Shared<'_> {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.load(key)
        }
        fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.save(key, value)
        }
    }

    /// Fails every write, counting attempts.
    #[derive(Default)]
    struct QuotaExceeded {
        writes: Cell<u32>,
    }

    impl KeyValueStore for QuotaExceeded {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
    }

    #[test]
    fn fresh_store_uses_defaults() {
        let store = SettingsStore::open(MemoryStore::new(), catalog());
        assert_eq!(store.get(), &TimerSettings::default());
        assert_eq!(store.completed_focus_count(), 0);
        assert!(store.is_persistent());
    }

    #[test]
    fn edits_survive_reopen() {
        let backend = MemoryStore::new();
        {
            let mut store = SettingsStore::open(Shared(&backend), catalog());
            let outcome = store.update(&SettingsPatch {
                pomodoro_minutes: Some(50),
                play_during_breaks: Some(true),
                ..Default::default()
            });
            assert!(outcome.is_clean());
            store.record_completed_focus_count(7);
        }
        let store = SettingsStore::open(Shared(&backend), catalog());
        assert_eq!(store.get().pomodoro_minutes, 50);
        assert!(store.get().play_during_breaks);
        assert_eq!(store.completed_focus_count(), 7);
    }

    #[test]
    fn stale_persisted_fields_fall_back_to_defaults() {
        let backend = MemoryStore::new();
        backend
            .save(
                SETTINGS_KEY,
                r#"{"volume": 70, "recitation_reciter_id": "gone", "long_break_minutes": -3}"#,
            )
            .unwrap();
        let store = SettingsStore::open(backend, catalog());
        assert_eq!(store.get().volume, 70);
        assert_eq!(store.get().recitation_reciter_id.as_deref(), Some("qtm"));
        assert_eq!(store.get().long_break_minutes, 15);
    }

    #[test]
    fn garbage_persisted_values_are_ignored() {
        let backend = MemoryStore::new();
        backend.save(SETTINGS_KEY, "not json").unwrap();
        backend.save(FOCUS_COUNT_KEY, "many").unwrap();
        let store = SettingsStore::open(backend, catalog());
        assert_eq!(store.get(), &TimerSettings::default());
        assert_eq!(store.completed_focus_count(), 0);
        assert!(store.is_persistent());
    }

    #[test]
    fn unavailable_backend_degrades_once() {
        let mut store = SettingsStore::open(UnavailableStore::new("disabled"), catalog());
        assert!(!store.is_persistent());
        assert!(store.take_persistence_warning().is_some());
        assert!(store.take_persistence_warning().is_none());

        let outcome = store.update(&SettingsPatch {
            volume: Some(10),
            ..Default::default()
        });
        assert!(outcome.is_clean());
        assert_eq!(store.get().volume, 10);
        assert!(store.take_persistence_warning().is_none());
    }

    #[test]
    fn failed_write_stops_further_writes() {
        let mut store = SettingsStore::open(QuotaExceeded::default(), catalog());
        assert!(store.is_persistent());
        store.update(&SettingsPatch {
            volume: Some(10),
            ..Default::default()
        });
        store.update(&SettingsPatch {
            volume: Some(20),
            ..Default::default()
        });
        store.record_completed_focus_count(1);
        assert_eq!(store.backend.writes.get(), 1);
        assert_eq!(store.get().volume, 20);
        assert!(store.take_persistence_warning().is_some());
        assert!(store.take_persistence_warning().is_none());
    }

    #[test]
    fn toggling_ambient_track_flips_membership_and_enables_sound() {
        let mut store = SettingsStore::open(MemoryStore::new(), catalog());
        store.update(&SettingsPatch {
            sound_enabled: Some(false),
            ..Default::default()
        });

        store.toggle_ambient_track("rain");
        assert!(store.get().active_ambient_track_ids.contains("rain"));
        assert!(store.get().sound_enabled);

        store.toggle_ambient_track("birds");
        assert!(!store.get().active_ambient_track_ids.contains("birds"));

        let outcome = store.toggle_ambient_track("lava");
        assert_eq!(outcome.rejected[0].field, SettingField::ActiveAmbientTrackIds);
        assert!(!store.get().active_ambient_track_ids.contains("lava"));
    }

    #[test]
    fn rejected_toggle_leaves_sound_off() {
        let mut store = SettingsStore::open(MemoryStore::new(), catalog());
        store.update(&SettingsPatch {
            sound_enabled: Some(false),
            ..Default::default()
        });
        let before = store.get().clone();

        let outcome = store.toggle_ambient_track("lava");
        assert_eq!(outcome.rejected.len(), 1);
        assert!(outcome.applied.is_empty());
        assert_eq!(store.get(), &before);
        assert!(!store.get().sound_enabled);
    }

    #[test]
    fn emptying_ambient_set_enables_sound_only_with_recitation() {
        let mut store = SettingsStore::open(MemoryStore::new(), catalog());
        store.update(&SettingsPatch {
            sound_enabled: Some(false),
            active_ambient_track_ids: Some(["birds".to_string()].into()),
            ..Default::default()
        });

        store.toggle_ambient_track("birds");
        assert!(store.get().active_ambient_track_ids.is_empty());
        assert!(store.get().sound_enabled);

        store.update(&SettingsPatch {
            sound_enabled: Some(false),
            active_ambient_track_ids: Some(["birds".to_string()].into()),
            recitation_track_id: Some(None),
            ..Default::default()
        });
        store.toggle_ambient_track("birds");
        assert!(store.get().active_ambient_track_ids.is_empty());
        assert!(!store.get().sound_enabled);
    }

    #[test]
    fn selecting_recitation_enables_sound() {
        let mut store = SettingsStore::open(MemoryStore::new(), catalog());
        store.update(&SettingsPatch {
            sound_enabled: Some(false),
            ..Default::default()
        });
        let outcome = store.select_recitation_track("036");
        assert!(outcome.touched(SettingField::RecitationTrackId));
        assert!(outcome.touched(SettingField::SoundEnabled));
        assert!(store.get().sound_enabled);

        store.update(&SettingsPatch {
            sound_enabled: Some(false),
            ..Default::default()
        });
        let outcome = store.select_reciter("nobody");
        assert!(!outcome.is_clean());
        assert!(!store.get().sound_enabled);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = SettingsStore::open(MemoryStore::new(), catalog());
        store.update(&SettingsPatch {
            volume: Some(99),
            ..Default::default()
        });
        store.reset();
        assert_eq!(store.get(), &TimerSettings::default());
    }
}
