//! Main application state and logic.

use crate::engine::{TickOutcome, TimerEngine, TimerObserver};
use crate::models::{Mode, Settings, SettingsError, SettingsInput};
use crate::persistence::SettingsStore;
use crate::theme::ColorPalette;
use tracing::{debug, error, info};

/// Events that should trigger notifications/sounds in the front end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionEvent {
    /// The phase that just finished.
    pub finished: Mode,
    /// The phase now loaded.
    pub next: Mode,
    /// Work sessions completed since the last flow reset.
    pub completed_work: u32,
    /// Whether the next phase is already counting down.
    pub auto_started: bool,
}

/// User requests coming from a front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleRunning,
    Start,
    Pause,
    Reset,
    ResetFlow,
    Skip,
    ToggleTheme,
    ToggleSound,
    ToggleAutoStart,
    UpdateSettings(SettingsInput),
    RestoreDefaults,
    Quit,
}

/// Result of handling an action.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResult {
    /// Nothing visible changed.
    Continue,
    /// User requested quit.
    Quit,
    /// Timer state changed, display needs update.
    StateChanged,
    /// Settings changed, menus and colours need a rebuild.
    SettingsChanged,
    /// State changed with a completion event.
    StateChangedWithCompletion(CompletionEvent),
}

/// Collects engine notifications until the app drains them.
#[derive(Debug, Default)]
pub struct AppObserver {
    finished: Option<Mode>,
}

impl TimerObserver for AppObserver {
    fn on_complete(&mut self, previous: Mode) {
        self.finished = Some(previous);
    }

    fn on_mode_change(&mut self, mode: Mode) {
        debug!(mode = %mode, "Mode changed");
    }
}

/// Application state shared by both front ends. Owned by one thread.
pub struct App {
    pub engine: TimerEngine<AppObserver>,
    pub settings: Settings,
    store: SettingsStore,
}

impl App {
    /// Loads settings from `store` and builds the engine from them.
    pub fn new(store: SettingsStore) -> Self {
        let settings = store.load();
        info!(path = %store.path().display(), ?settings, "Loaded settings");
        Self {
            engine: TimerEngine::new(settings.timer_config(), AppObserver::default()),
            settings,
            store,
        }
    }

    pub fn palette(&self) -> &'static ColorPalette {
        self.store.theme(self.settings.theme_mode)
    }

    /// Advances the timer by one second.
    /// Returns (state_changed, optional_completion_event).
    pub fn tick(&mut self) -> (bool, Option<CompletionEvent>) {
        let outcome = self.engine.tick();
        if let TickOutcome::Completed(mode) = outcome {
            info!(completed = %mode, next = %self.engine.mode(), "Phase finished");
        }
        (outcome != TickOutcome::Idle, self.take_completion())
    }

    fn take_completion(&mut self) -> Option<CompletionEvent> {
        let finished = self.engine.observer_mut().finished.take()?;
        Some(CompletionEvent {
            finished,
            next: self.engine.mode(),
            completed_work: self.engine.completed_work_count(),
            auto_started: self.engine.is_running(),
        })
    }

    /// Applies a user action.
    pub fn handle(&mut self, action: Action) -> EventResult {
        info!(?action, "Handling action");
        match action {
            Action::ToggleRunning => {
                if self.engine.is_running() {
                    self.engine.pause();
                } else {
                    self.engine.start();
                }
                EventResult::StateChanged
            }
            Action::Start => {
                self.engine.start();
                EventResult::StateChanged
            }
            Action::Pause => {
                self.engine.pause();
                EventResult::StateChanged
            }
            Action::Reset => {
                self.engine.reset();
                EventResult::StateChanged
            }
            Action::ResetFlow => {
                self.engine.reset_flow();
                EventResult::StateChanged
            }
            Action::Skip => {
                self.engine.skip();
                match self.take_completion() {
                    Some(event) => EventResult::StateChangedWithCompletion(event),
                    None => EventResult::StateChanged,
                }
            }
            Action::ToggleTheme => {
                self.store.toggle_theme(&mut self.settings);
                EventResult::SettingsChanged
            }
            Action::ToggleSound => {
                self.update_setting(|s| s.enable_sound = !s.enable_sound);
                EventResult::SettingsChanged
            }
            Action::ToggleAutoStart => {
                let mut input = SettingsInput::from_settings(&self.settings);
                input.auto_start = !input.auto_start;
                self.handle_settings(input)
            }
            Action::UpdateSettings(input) => self.handle_settings(input),
            Action::RestoreDefaults => {
                self.settings = self.store.reset_to_defaults().unwrap_or_else(|e| {
                    error!(error = %e, "Failed to save default settings");
                    Settings::default()
                });
                self.engine.reconfigure(self.settings.timer_config());
                EventResult::SettingsChanged
            }
            Action::Quit => EventResult::Quit,
        }
    }

    fn handle_settings(&mut self, input: SettingsInput) -> EventResult {
        match self.apply_settings(input) {
            Ok(()) => EventResult::SettingsChanged,
            Err(e) => {
                error!(error = %e, "Rejected settings");
                EventResult::Continue
            }
        }
    }

    /// Validates, persists and applies a settings form. The timer restarts
    /// its flow with the new durations. Invalid input leaves everything as is.
    pub fn apply_settings(&mut self, input: SettingsInput) -> Result<(), SettingsError> {
        input.validate()?;
        self.update_setting(|s| s.apply(&input));
        self.engine.reconfigure(self.settings.timer_config());
        Ok(())
    }

    /// Updates a setting and saves it. A failed save keeps the in-memory value.
    pub fn update_setting<F>(&mut self, updater: F)
    where
        F: FnOnce(&mut Settings),
    {
        updater(&mut self.settings);
        if let Err(e) = self.store.save(&self.settings) {
            error!(error = %e, "Failed to save settings");
        }
    }
}
