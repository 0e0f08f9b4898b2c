//! The component the UI talks to.
//!
//! `FocusController` owns the timer, the settings store and the audio
//! engine. Every command updates state first and then reconciles audio
//! against the new state, so playback is always a function of state and
//! never of which command ran.

use std::sync::Arc;

use crate::audio::{AudioEngine, CompletionNotifier, PlaybackRuntime, ReconcileReport, StreamKey};
use crate::catalog::Catalog;
use crate::events::TimerEvent;
use crate::settings::{SettingsPatch, SettingsStore, TimerSettings, UpdateOutcome};
use crate::timer::{Clock, SystemClock, TimerMachine, TimerSnapshot};

pub struct FocusController<R: PlaybackRuntime, C: Clock = SystemClock> {
    settings: SettingsStore,
    timer: TimerMachine<C>,
    audio: AudioEngine<R>,
    notifier: CompletionNotifier,
    shut_down: bool,
}

impl<R: PlaybackRuntime, C: Clock> FocusController<R, C> {
    /// Build a controller around an opened settings store. The timer starts
    /// idle in Focus with the persisted focus count.
    pub fn new(settings: SettingsStore, runtime: R, clock: C, notifier: CompletionNotifier) -> Self {
        let timer = TimerMachine::new(settings.get().durations(), clock)
            .with_completed_focus_count(settings.completed_focus_count());
        let audio = AudioEngine::new(runtime, Arc::clone(settings.catalog()));
        Self {
            settings,
            timer,
            audio,
            notifier,
            shut_down: false,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }

    pub fn settings(&self) -> &TimerSettings {
        self.settings.get()
    }

    pub fn catalog(&self) -> &Catalog {
        self.settings.catalog()
    }

    pub fn progress(&self) -> f64 {
        self.timer.snapshot().progress_ratio()
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.timer.completed_focus_count()
    }

    /// Whether the host should be delivering ticks.
    pub fn is_ticking(&self) -> bool {
        !self.shut_down && self.timer.is_ticking()
    }

    pub fn is_persistent(&self) -> bool {
        self.settings.is_persistent()
    }

    /// The one-time warning raised when storage became unavailable.
    pub fn take_persistence_warning(&mut self) -> Option<String> {
        self.settings.take_persistence_warning()
    }

    pub fn live_streams(&self) -> Vec<StreamKey> {
        self.audio.live_keys()
    }

    pub fn runtime(&self) -> &R {
        self.audio.runtime()
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        self.audio.runtime_mut()
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Option<TimerEvent> {
        let event = self.timer.start();
        self.after_timer(event)
    }

    pub fn pause(&mut self) -> Option<TimerEvent> {
        let event = self.timer.pause();
        self.after_timer(event)
    }

    pub fn skip(&mut self) -> Option<TimerEvent> {
        let event = self.timer.skip();
        self.after_timer(event)
    }

    /// Deliver a tick. Audio is only reconciled when the tick completes
    /// the phase.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        let event = self.timer.tick();
        self.after_timer(event)
    }

    // ── Settings commands ────────────────────────────────────────────

    pub fn update_settings(&mut self, patch: &SettingsPatch) -> UpdateOutcome {
        let outcome = self.settings.update(patch);
        self.after_settings(&outcome);
        outcome
    }

    pub fn toggle_ambient_track(&mut self, id: &str) -> UpdateOutcome {
        let outcome = self.settings.toggle_ambient_track(id);
        self.after_settings(&outcome);
        outcome
    }

    pub fn select_reciter(&mut self, id: &str) -> UpdateOutcome {
        let outcome = self.settings.select_reciter(id);
        self.after_settings(&outcome);
        outcome
    }

    pub fn select_recitation_track(&mut self, id: &str) -> UpdateOutcome {
        let outcome = self.settings.select_recitation_track(id);
        self.after_settings(&outcome);
        outcome
    }

    pub fn reset_settings(&mut self) {
        self.settings.reset();
        self.timer.set_durations(self.settings.get().durations());
        self.reconcile();
    }

    // ── Playback ─────────────────────────────────────────────────────

    /// Collect streams the runtime reports as finished. A finished
    /// recitation with auto-advance moves the selection to the next track
    /// and starts it. Returns the ids advanced to.
    pub fn poll_playback(&mut self) -> Vec<String> {
        let finished = self.audio.runtime_mut().take_finished();
        if finished.is_empty() {
            return Vec::new();
        }

        let timer = self.timer.snapshot();
        let mut advanced = Vec::new();
        for handle in finished {
            let next = self
                .audio
                .handle_finished(handle, &timer, self.settings.get());
            if let Some(next) = next {
                self.settings.update(&SettingsPatch {
                    recitation_track_id: Some(Some(next.clone())),
                    ..Default::default()
                });
                advanced.push(next);
            }
        }
        self.reconcile();
        advanced
    }

    /// Apply the playback set the current state calls for. Also retries
    /// streams the runtime refused earlier.
    pub fn reconcile(&mut self) -> ReconcileReport {
        if self.shut_down {
            return ReconcileReport::default();
        }
        let timer = self.timer.snapshot();
        self.audio.reconcile(&timer, self.settings.get())
    }

    /// Stop the countdown and release every live handle. Safe to call more
    /// than once; also runs on drop.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if let Some(event) = self.timer.pause() {
            tracing::debug!(?event, "timer stopped for shutdown");
        }
        self.audio.shutdown();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn after_timer(&mut self, event: Option<TimerEvent>) -> Option<TimerEvent> {
        let event = event?;
        tracing::debug!(?event, "timer event");

        if let Some(count) = event.finished_focus_count() {
            self.settings.record_completed_focus_count(count);
        }
        self.reconcile();
        if event.is_completion() {
            self.notifier
                .notify(self.settings.get(), self.audio.runtime_mut());
        }
        Some(event)
    }

    fn after_settings(&mut self, outcome: &UpdateOutcome) {
        if outcome.touched_durations() {
            self.timer.set_durations(self.settings.get().durations());
        }
        self.reconcile();
    }
}

impl<R: PlaybackRuntime, C: Clock> Drop for FocusController<R, C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
