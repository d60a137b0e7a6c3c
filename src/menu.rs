//! Menu building and updating for the tray dropdown.

use crate::app::App;
use crate::event::{
    preset_id, ID_AUTO_START_TOGGLE, ID_DEFAULTS, ID_PROGRESS, ID_QUIT, ID_RESET, ID_RESET_FLOW,
    ID_ROUNDS, ID_SKIP, ID_SOUND_TOGGLE, ID_STATUS, ID_THEME_TOGGLE, ID_TOGGLE, INTERVAL_PRESETS,
    LONG_PRESETS, PREFIX_INTERVAL, PREFIX_LONG, PREFIX_SHORT, PREFIX_WORK, SHORT_PRESETS,
    WORK_PRESETS,
};
use crate::models::{Settings, ThemeMode};
use crate::timer::{format_dots, format_progress, format_status};
use muda::accelerator::Accelerator;
use muda::{CheckMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Menu error: {0}")]
    Muda(#[from] muda::Error),
}

/// A preset submenu and its check items keyed by value.
pub struct PresetMenu {
    pub submenu: Submenu,
    pub checks: HashMap<u32, CheckMenuItem>,
    title: &'static str,
    unit: &'static str,
}

impl PresetMenu {
    fn build(
        title: &'static str,
        unit: &'static str,
        prefix: &str,
        presets: &[u32],
        current: u32,
    ) -> Result<Self, MenuError> {
        let submenu = Submenu::new(format!("{}: {} {}", title, current, unit), true);
        let mut checks = HashMap::new();
        for &value in presets {
            let item = CheckMenuItem::with_id(
                MenuId::new(preset_id(prefix, value)),
                format!("{} {}", value, unit),
                true,
                value == current,
                None::<Accelerator>,
            );
            submenu.append(&item)?;
            checks.insert(value, item);
        }
        Ok(Self {
            submenu,
            checks,
            title,
            unit,
        })
    }

    fn sync(&self, current: u32) {
        self.submenu
            .set_text(format!("{}: {} {}", self.title, current, self.unit));
        for (&value, check) in &self.checks {
            check.set_checked(value == current);
        }
    }
}

/// Holds references to menu items that need dynamic updates.
pub struct MenuItems {
    pub status: MenuItem,
    pub progress: MenuItem,
    pub rounds: MenuItem,
    pub toggle: MenuItem,
    pub work: PresetMenu,
    pub short_break: PresetMenu,
    pub long_break: PresetMenu,
    pub interval: PresetMenu,
    pub auto_start_toggle: CheckMenuItem,
    pub sound_toggle: CheckMenuItem,
    pub theme_toggle: MenuItem,
}

fn info_item(id: &str, text: String) -> MenuItem {
    MenuItem::with_id(MenuId::new(id), text, false, None::<Accelerator>)
}

fn action_item(id: &str, text: &str) -> MenuItem {
    MenuItem::with_id(MenuId::new(id), text, true, None::<Accelerator>)
}

/// Builds the complete menu structure.
pub fn build_menu(app: &App) -> Result<(Menu, MenuItems), MenuError> {
    let menu = Menu::new();
    let engine = &app.engine;
    let settings = &app.settings;

    // Status display (disabled, info only)
    let status = info_item(ID_STATUS, format_status(engine));
    let progress = info_item(ID_PROGRESS, format_progress(engine.progress_ratio(), 20));
    let rounds = info_item(ID_ROUNDS, format_rounds(app));
    menu.append(&status)?;
    menu.append(&progress)?;
    menu.append(&rounds)?;

    menu.append(&PredefinedMenuItem::separator())?;

    // Control buttons
    let toggle = action_item(ID_TOGGLE, toggle_label(engine.is_running()));
    menu.append(&toggle)?;
    menu.append(&action_item(ID_RESET, "↺  Reset"))?;
    menu.append(&action_item(ID_RESET_FLOW, "⟲  Reset Flow"))?;
    menu.append(&action_item(ID_SKIP, "⏭  Skip"))?;

    menu.append(&PredefinedMenuItem::separator())?;

    // Settings submenu
    let settings_menu = Submenu::new("⚙  Settings", true);
    let work = PresetMenu::build(
        "Focus",
        "min",
        PREFIX_WORK,
        &WORK_PRESETS,
        settings.work_duration,
    )?;
    let short_break = PresetMenu::build(
        "Short Break",
        "min",
        PREFIX_SHORT,
        &SHORT_PRESETS,
        settings.short_break_duration,
    )?;
    let long_break = PresetMenu::build(
        "Long Break",
        "min",
        PREFIX_LONG,
        &LONG_PRESETS,
        settings.long_break_duration,
    )?;
    let interval = PresetMenu::build(
        "Long Break After",
        "sessions",
        PREFIX_INTERVAL,
        &INTERVAL_PRESETS,
        settings.long_break_interval,
    )?;
    settings_menu.append(&work.submenu)?;
    settings_menu.append(&short_break.submenu)?;
    settings_menu.append(&long_break.submenu)?;
    settings_menu.append(&interval.submenu)?;

    settings_menu.append(&PredefinedMenuItem::separator())?;

    let auto_start_toggle = CheckMenuItem::with_id(
        MenuId::new(ID_AUTO_START_TOGGLE),
        "Auto Start Next Phase",
        true,
        settings.auto_start,
        None::<Accelerator>,
    );
    let sound_toggle = CheckMenuItem::with_id(
        MenuId::new(ID_SOUND_TOGGLE),
        "Sound Enabled",
        true,
        settings.enable_sound,
        None::<Accelerator>,
    );
    let theme_toggle = action_item(ID_THEME_TOGGLE, theme_label(settings.theme_mode));
    settings_menu.append(&auto_start_toggle)?;
    settings_menu.append(&sound_toggle)?;
    settings_menu.append(&theme_toggle)?;

    settings_menu.append(&PredefinedMenuItem::separator())?;
    settings_menu.append(&action_item(ID_DEFAULTS, "Restore Defaults"))?;
    menu.append(&settings_menu)?;

    menu.append(&PredefinedMenuItem::separator())?;

    // Quit
    menu.append(&action_item(ID_QUIT, "Quit Pomocus"))?;

    let items = MenuItems {
        status,
        progress,
        rounds,
        toggle,
        work,
        short_break,
        long_break,
        interval,
        auto_start_toggle,
        sound_toggle,
        theme_toggle,
    };

    Ok((menu, items))
}

/// Updates the timer-driven items.
pub fn update_menu_items(items: &MenuItems, app: &App) {
    let engine = &app.engine;
    items.status.set_text(format_status(engine));
    items
        .progress
        .set_text(format_progress(engine.progress_ratio(), 20));
    items.rounds.set_text(format_rounds(app));
    items.toggle.set_text(toggle_label(engine.is_running()));
}

/// Brings checkmarks and submenu titles in line with `settings`.
pub fn sync_settings(items: &MenuItems, settings: &Settings) {
    items.work.sync(settings.work_duration);
    items.short_break.sync(settings.short_break_duration);
    items.long_break.sync(settings.long_break_duration);
    items.interval.sync(settings.long_break_interval);
    items.auto_start_toggle.set_checked(settings.auto_start);
    items.sound_toggle.set_checked(settings.enable_sound);
    items.theme_toggle.set_text(theme_label(settings.theme_mode));
}

fn format_rounds(app: &App) -> String {
    format!("Rounds: {}", format_dots(&app.engine.progress_dots()))
}

fn toggle_label(running: bool) -> &'static str {
    if running {
        "⏸  Pause"
    } else {
        "▶  Start"
    }
}

fn theme_label(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Dark => "Theme: Dark",
        ThemeMode::Light => "Theme: Light",
    }
}
