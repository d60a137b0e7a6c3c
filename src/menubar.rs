//! macOS menubar front end.
//!
//! Everything runs on the winit main thread: menu events are drained and the
//! timer is ticked from `about_to_wait`, so the app needs no locking.

use crate::app::{App, EventResult};
use crate::audio::AudioPlayer;
use crate::event;
use crate::menu::{self, MenuItems};
use crate::notifications;
use crate::timer::{self, Ticker, TICK_INTERVAL};
use crate::tray::{self, TrayError};
use muda::MenuEvent;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tray_icon::{TrayIcon, TrayIconBuilder};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

/// Longest sleep between checks of the menu event channel.
const MENU_POLL: Duration = Duration::from_millis(50);

/// Application handler for the winit event loop.
struct Menubar {
    app: App,
    tray: TrayIcon,
    menu_items: MenuItems,
    ticker: Ticker,
    audio: Option<AudioPlayer>,
}

impl Menubar {
    fn refresh(&self) {
        menu::update_menu_items(&self.menu_items, &self.app);
        self.tray
            .set_title(Some(timer::format_tray_title(&self.app.engine)));
    }

    fn refresh_icon(&self) {
        let accent = self.app.palette().accent(self.app.engine.mode());
        match tray::load_icon(accent) {
            Ok(icon) => {
                if let Err(e) = self.tray.set_icon(Some(icon)) {
                    warn!(error = %e, "Failed to update tray icon");
                }
            }
            Err(e) => warn!(error = %e, "Failed to build tray icon"),
        }
    }

    fn handle_result(&mut self, result: EventResult, event_loop: &ActiveEventLoop) {
        match result {
            EventResult::Quit => event_loop.exit(),
            EventResult::StateChanged => {
                self.refresh();
                self.refresh_icon();
            }
            EventResult::SettingsChanged => {
                menu::sync_settings(&self.menu_items, &self.app.settings);
                self.refresh();
                self.refresh_icon();
            }
            EventResult::StateChangedWithCompletion(completion) => {
                self.refresh();
                self.refresh_icon();
                notifications::alert_completion(&self.app.settings, self.audio.as_ref(), completion);
            }
            EventResult::Continue => {}
        }
    }

    fn process_menu_events(&mut self, event_loop: &ActiveEventLoop) {
        while let Ok(menu_event) = MenuEvent::receiver().try_recv() {
            let id = menu_event.id().as_ref();
            // Check items toggle themselves on click; re-sync from settings so a
            // rejected or failed change doesn't leave them out of step.
            let Some(action) = event::action_for_id(id, &self.app.settings) else {
                menu::sync_settings(&self.menu_items, &self.app.settings);
                continue;
            };
            let result = self.app.handle(action);
            self.handle_result(result, event_loop);
        }
    }

    fn process_ticks(&mut self, event_loop: &ActiveEventLoop) {
        for _ in 0..self.ticker.poll(Instant::now()) {
            let result = match self.app.tick() {
                (_, Some(completion)) => EventResult::StateChangedWithCompletion(completion),
                (true, None) => EventResult::StateChanged,
                (false, None) => EventResult::Continue,
            };
            self.handle_result(result, event_loop);
        }
    }
}

impl ApplicationHandler for Menubar {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        // Nothing to do on resume for a tray-only app
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        _event: WindowEvent,
    ) {
        // No window events for a tray-only app
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.process_menu_events(event_loop);
        self.process_ticks(event_loop);

        let now = Instant::now();
        let wake = self.ticker.deadline().min(now + MENU_POLL);
        event_loop.set_control_flow(ControlFlow::WaitUntil(wake));
    }
}

/// Runs the menubar front end until the user quits.
pub fn run(app: App) -> Result<(), Box<dyn std::error::Error>> {
    // Create event loop (required for tray on macOS)
    let event_loop = EventLoop::new()?;

    let (built_menu, menu_items) = menu::build_menu(&app)?;

    let icon = tray::load_icon(app.palette().accent(app.engine.mode()))?;
    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(built_menu))
        .with_icon(icon)
        .with_title(timer::format_tray_title(&app.engine))
        .with_tooltip(timer::format_title(&app.engine))
        .build()
        .map_err(TrayError::from)?;

    // Audio is created on the main thread to avoid Send issues
    let audio = AudioPlayer::new()
        .map_err(|e| warn!(error = %e, "Audio unavailable"))
        .ok();

    let mut menubar = Menubar {
        app,
        tray,
        menu_items,
        ticker: Ticker::new(Instant::now(), TICK_INTERVAL),
        audio,
    };

    info!("Menubar running");
    event_loop.run_app(&mut menubar)?;

    Ok(())
}
