//! Menu event handling.

use crate::app::Action;
use crate::models::{Settings, SettingsInput};

// Menu item IDs as constants
pub const ID_STATUS: &str = "status";
pub const ID_PROGRESS: &str = "progress";
pub const ID_ROUNDS: &str = "rounds";
pub const ID_TOGGLE: &str = "toggle";
pub const ID_RESET: &str = "reset";
pub const ID_RESET_FLOW: &str = "reset_flow";
pub const ID_SKIP: &str = "skip";
pub const ID_AUTO_START_TOGGLE: &str = "auto_start_toggle";
pub const ID_SOUND_TOGGLE: &str = "sound_toggle";
pub const ID_THEME_TOGGLE: &str = "theme_toggle";
pub const ID_DEFAULTS: &str = "defaults";
pub const ID_QUIT: &str = "quit";

/// Prefixes of the preset items in the duration submenus.
pub const PREFIX_WORK: &str = "work_";
pub const PREFIX_SHORT: &str = "short_";
pub const PREFIX_LONG: &str = "long_";
pub const PREFIX_INTERVAL: &str = "interval_";

pub const WORK_PRESETS: [u32; 6] = [15, 20, 25, 30, 45, 60];
pub const SHORT_PRESETS: [u32; 4] = [3, 5, 10, 15];
pub const LONG_PRESETS: [u32; 4] = [10, 15, 20, 30];
pub const INTERVAL_PRESETS: [u32; 5] = [2, 3, 4, 5, 6];

/// Maps a menu item ID to the action it triggers. Informational items and
/// unknown IDs map to `None`.
pub fn action_for_id(id: &str, settings: &Settings) -> Option<Action> {
    let action = match id {
        ID_TOGGLE => Action::ToggleRunning,
        ID_RESET => Action::Reset,
        ID_RESET_FLOW => Action::ResetFlow,
        ID_SKIP => Action::Skip,
        ID_AUTO_START_TOGGLE => Action::ToggleAutoStart,
        ID_SOUND_TOGGLE => Action::ToggleSound,
        ID_THEME_TOGGLE => Action::ToggleTheme,
        ID_DEFAULTS => Action::RestoreDefaults,
        ID_QUIT => Action::Quit,
        _ => return duration_change(id, settings).map(Action::UpdateSettings),
    };
    Some(action)
}

/// Handles duration setting changes from submenus.
fn duration_change(id: &str, settings: &Settings) -> Option<SettingsInput> {
    let mut input = SettingsInput::from_settings(settings);
    let parse = |prefix: &str| id.strip_prefix(prefix)?.parse::<u32>().ok();

    if let Some(mins) = parse(PREFIX_WORK) {
        input.work_mins = mins;
    } else if let Some(mins) = parse(PREFIX_SHORT) {
        input.short_break_mins = mins;
    } else if let Some(mins) = parse(PREFIX_LONG) {
        input.long_break_mins = mins;
    } else if let Some(count) = parse(PREFIX_INTERVAL) {
        input.long_break_interval = count;
    } else {
        return None;
    }
    Some(input)
}

/// Menu ID of a preset item.
pub fn preset_id(prefix: &str, value: u32) -> String {
    format!("{}{}", prefix, value)
}
