use serde::Serialize;
use std::sync::Arc;

use super::desired::{audio_gate, desired_playback, StreamKey};
use super::registry::{EnsureOutcome, StreamRegistry};
use super::runtime::{HandleId, PlaybackRuntime};
use crate::catalog::Catalog;
use crate::error::PlaybackError;
use crate::settings::TimerSettings;
use crate::timer::TimerSnapshot;

/// A stream the runtime refused to start. It stays desired and is retried
/// on the next reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamFailure {
    pub key: StreamKey,
    #[serde(serialize_with = "serialize_error")]
    pub error: PlaybackError,
}

fn serialize_error<S: serde::Serializer>(error: &PlaybackError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// What one reconcile pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub started: Vec<StreamKey>,
    pub restarted: Vec<StreamKey>,
    pub updated: Vec<StreamKey>,
    pub stopped: Vec<StreamKey>,
    pub failed: Vec<StreamFailure>,
}

impl ReconcileReport {
    /// True when no live handle was touched.
    pub fn is_noop(&self) -> bool {
        self.started.is_empty()
            && self.restarted.is_empty()
            && self.updated.is_empty()
            && self.stopped.is_empty()
    }
}

/// Owns every looping handle and keeps them in line with the state it is
/// given.
pub struct AudioEngine<R: PlaybackRuntime> {
    runtime: R,
    catalog: Arc<Catalog>,
    registry: StreamRegistry,
}

impl<R: PlaybackRuntime> AudioEngine<R> {
    pub fn new(runtime: R, catalog: Arc<Catalog>) -> Self {
        Self {
            runtime,
            catalog,
            registry: StreamRegistry::new(),
        }
    }

    /// Bring live handles in line with `timer` and `settings`.
    ///
    /// Running this twice with the same inputs makes no runtime calls the
    /// second time, unless a stream failed to start the first time.
    pub fn reconcile(&mut self, timer: &TimerSnapshot, settings: &TimerSettings) -> ReconcileReport {
        let desired = desired_playback(timer, settings, &self.catalog);
        let mut report = ReconcileReport::default();

        let stale: Vec<StreamKey> = self
            .registry
            .keys()
            .filter(|key| !desired.contains(key))
            .cloned()
            .collect();
        for key in stale {
            self.registry.release(&key, &mut self.runtime);
            report.stopped.push(key);
        }

        for (key, params) in desired.streams {
            match self.registry.ensure(key.clone(), params, &mut self.runtime) {
                Ok(EnsureOutcome::Unchanged) => {}
                Ok(EnsureOutcome::Updated) => report.updated.push(key),
                Ok(EnsureOutcome::Started) => report.started.push(key),
                Ok(EnsureOutcome::Restarted) => report.restarted.push(key),
                Err(error) => {
                    tracing::warn!(stream = ?key, %error, "playback refused, will retry");
                    report.failed.push(StreamFailure { key, error });
                }
            }
        }

        if !report.is_noop() {
            tracing::debug!(
                started = report.started.len(),
                restarted = report.restarted.len(),
                updated = report.updated.len(),
                stopped = report.stopped.len(),
                "audio reconciled"
            );
        }
        report
    }

    /// Handle a stream that played to its end.
    ///
    /// The handle is released either way. If it was the recitation stream
    /// and auto-advance applies, returns the id of the track that should
    /// play next; the caller records it in settings and reconciles.
    pub fn handle_finished(
        &mut self,
        handle: HandleId,
        timer: &TimerSnapshot,
        settings: &TimerSettings,
    ) -> Option<String> {
        let key = self.registry.key_for(handle)?.clone();
        self.registry.release(&key, &mut self.runtime);

        if key != StreamKey::Recitation
            || !settings.auto_advance_recitation
            || !audio_gate(timer, settings)
            || settings.recitation_reciter_id.is_none()
        {
            return None;
        }
        let current = settings.recitation_track_id.as_deref()?;
        let next = self.catalog.next_recitation_track(current)?;
        tracing::info!(from = current, to = %next.id, "recitation advanced");
        Some(next.id.clone())
    }

    /// Destroy every live handle. Returns how many were live.
    pub fn shutdown(&mut self) -> usize {
        let released = self.registry.release_all(&mut self.runtime);
        if released > 0 {
            tracing::debug!(released, "audio shut down");
        }
        released
    }

    pub fn live_handle(&self, key: &StreamKey) -> Option<HandleId> {
        self.registry.handle(key)
    }

    pub fn live_keys(&self) -> Vec<StreamKey> {
        self.registry.keys().cloned().collect()
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ScriptedRuntime;
    use crate::timer::{Phase, Status};

    fn engine() -> AudioEngine<ScriptedRuntime> {
        AudioEngine::new(ScriptedRuntime::new(), Arc::new(Catalog::builtin()))
    }

    fn timer(phase: Phase, status: Status) -> TimerSnapshot {
        TimerSnapshot {
            phase,
            status,
            remaining_seconds: 1500,
            total_seconds: 1500,
            completed_focus_count: 0,
        }
    }

    fn ambient(id: &str) -> StreamKey {
        StreamKey::Ambient(id.into())
    }

    #[test]
    fn second_reconcile_makes_no_calls() {
        let mut engine = engine();
        let settings = TimerSettings::default();
        let running = timer(Phase::Focus, Status::Running);

        let first = engine.reconcile(&running, &settings);
        assert_eq!(first.started.len(), 3);
        engine.runtime_mut().take_calls();

        let second = engine.reconcile(&running, &settings);
        assert!(second.is_noop());
        assert!(engine.runtime().calls().is_empty());
    }

    #[test]
    fn break_without_opt_in_is_silent_until_flipped() {
        let mut engine = engine();
        let mut settings = TimerSettings::default();
        let on_break = timer(Phase::ShortBreak, Status::Running);

        engine.reconcile(&on_break, &settings);
        assert!(engine.live_keys().is_empty());

        let ids_before = settings.active_ambient_track_ids.clone();
        settings.play_during_breaks = true;
        let report = engine.reconcile(&on_break, &settings);
        assert_eq!(report.started.len(), 3);
        assert!(engine.live_handle(&StreamKey::Recitation).is_some());
        assert_eq!(settings.active_ambient_track_ids, ids_before);
    }

    #[test]
    fn pausing_stops_everything() {
        let mut engine = engine();
        let settings = TimerSettings::default();
        engine.reconcile(&timer(Phase::Focus, Status::Running), &settings);
        let report = engine.reconcile(&timer(Phase::Focus, Status::Paused), &settings);
        assert_eq!(report.stopped.len(), 3);
        assert!(engine.runtime().live().is_empty());
    }

    #[test]
    fn removing_one_ambient_track_leaves_the_others_alone() {
        let mut engine = engine();
        let mut settings = TimerSettings::default();
        settings.active_ambient_track_ids =
            ["birds", "rain", "waves"].iter().map(|s| s.to_string()).collect();
        let running = timer(Phase::Focus, Status::Running);
        engine.reconcile(&running, &settings);

        let birds = engine.live_handle(&ambient("birds")).unwrap();
        let waves = engine.live_handle(&ambient("waves")).unwrap();
        let rain = engine.live_handle(&ambient("rain")).unwrap();
        engine.runtime_mut().take_calls();

        settings.active_ambient_track_ids.remove("rain");
        let report = engine.reconcile(&running, &settings);

        assert_eq!(report.stopped, vec![ambient("rain")]);
        assert!(report.started.is_empty());
        assert_eq!(engine.live_handle(&ambient("birds")), Some(birds));
        assert_eq!(engine.live_handle(&ambient("waves")), Some(waves));
        assert_eq!(
            engine.runtime().calls(),
            &[crate::audio::PlaybackCall::Destroy { handle: rain }]
        );
    }

    #[test]
    fn volume_change_is_applied_in_place() {
        let mut engine = engine();
        let mut settings = TimerSettings::default();
        let running = timer(Phase::Focus, Status::Running);
        engine.reconcile(&running, &settings);
        let recitation = engine.live_handle(&StreamKey::Recitation).unwrap();

        settings.volume = 90;
        settings.recitation_volume = 10;
        let report = engine.reconcile(&running, &settings);
        assert_eq!(report.updated.len(), 3);
        assert!(report.started.is_empty() && report.restarted.is_empty());
        assert_eq!(engine.live_handle(&StreamKey::Recitation), Some(recitation));
        assert_eq!(engine.runtime().live()[&recitation].volume, 10);
    }

    #[test]
    fn reciter_change_restarts_recitation() {
        let mut engine = engine();
        let mut settings = TimerSettings::default();
        let running = timer(Phase::Focus, Status::Running);
        engine.reconcile(&running, &settings);
        let before = engine.live_handle(&StreamKey::Recitation).unwrap();

        settings.recitation_reciter_id = Some("afs".into());
        let report = engine.reconcile(&running, &settings);
        assert_eq!(report.restarted, vec![StreamKey::Recitation]);
        let after = engine.live_handle(&StreamKey::Recitation).unwrap();
        assert_ne!(before, after);
        assert!(engine.runtime().live()[&after].source.ends_with("/afs/002.mp3"));
    }

    #[test]
    fn blocked_stream_is_retried_on_next_reconcile() {
        let mut engine = engine();
        engine.runtime_mut().set_block_all(true);
        let settings = TimerSettings::default();
        let running = timer(Phase::Focus, Status::Running);

        let report = engine.reconcile(&running, &settings);
        assert_eq!(report.failed.len(), 3);
        assert!(engine.live_keys().is_empty());

        engine.runtime_mut().set_block_all(false);
        let report = engine.reconcile(&running, &settings);
        assert_eq!(report.started.len(), 3);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn one_blocked_stream_does_not_affect_others() {
        let mut engine = engine();
        let catalog = Catalog::builtin();
        let birds_source = catalog.ambient_track("birds").unwrap().source.clone();
        engine.runtime_mut().block_source(birds_source);

        let report = engine.reconcile(&timer(Phase::Focus, Status::Running), &TimerSettings::default());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].key, ambient("birds"));
        assert_eq!(report.started.len(), 2);
    }

    #[test]
    fn finished_last_track_wraps_to_first() {
        let mut engine = engine();
        let settings = TimerSettings {
            auto_advance_recitation: true,
            recitation_track_id: Some("114".into()),
            ..TimerSettings::default()
        };
        let running = timer(Phase::Focus, Status::Running);
        engine.reconcile(&running, &settings);
        let handle = engine.live_handle(&StreamKey::Recitation).unwrap();

        let next = engine.handle_finished(handle, &running, &settings);
        assert_eq!(next.as_deref(), Some("001"));
        assert!(engine.live_handle(&StreamKey::Recitation).is_none());
        assert!(!engine.runtime().is_live(handle));
    }

    #[test]
    fn finished_without_auto_advance_only_releases() {
        let mut engine = engine();
        let settings = TimerSettings::default();
        let running = timer(Phase::Focus, Status::Running);
        engine.reconcile(&running, &settings);
        let handle = engine.live_handle(&StreamKey::Recitation).unwrap();

        assert_eq!(engine.handle_finished(handle, &running, &settings), None);
        let report = engine.reconcile(&running, &settings);
        assert_eq!(report.started, vec![StreamKey::Recitation]);
    }

    #[test]
    fn unknown_handle_is_ignored() {
        let mut engine = engine();
        let running = timer(Phase::Focus, Status::Running);
        assert_eq!(
            engine.handle_finished(HandleId(99), &running, &TimerSettings::default()),
            None
        );
    }

    #[test]
    fn shutdown_releases_all_handles() {
        let mut engine = engine();
        engine.reconcile(&timer(Phase::Focus, Status::Running), &TimerSettings::default());
        assert_eq!(engine.shutdown(), 3);
        assert_eq!(engine.shutdown(), 0);
        assert!(engine.runtime().live().is_empty());
    }
}
