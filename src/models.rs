//! Data models for the Pomocus application.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_WORK_MINS: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MINS: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINS: u32 = 15;
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 4;
pub const DEFAULT_AUTO_START: bool = false;
pub const DEFAULT_SOUND_ENABLED: bool = true;

/// Inclusive bounds for each setting. Values read back from the settings file
/// are clamped into them; values typed by the user are rejected outside them.
pub const WORK_RANGE: (u32, u32) = (1, 90);
pub const SHORT_BREAK_RANGE: (u32, u32) = (1, 30);
pub const LONG_BREAK_RANGE: (u32, u32) = (1, 60);
pub const INTERVAL_RANGE: (u32, u32) = (1, 10);

/// The phase the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }

    /// Heading shown above the countdown.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Work => "FOCUS TIME",
            Mode::ShortBreak => "SHORT BREAK",
            Mode::LongBreak => "LONG BREAK",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Mode::Work)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour scheme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// Parses a persisted theme name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// Timing parameters the engine runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub work_mins: u32,
    pub short_break_mins: u32,
    pub long_break_mins: u32,
    /// Work sessions completed before a long break.
    pub long_break_interval: u32,
    pub auto_start: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Settings::default().timer_config()
    }
}

impl TimerConfig {
    /// Configured length of `mode` in minutes.
    pub fn minutes_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_mins,
            Mode::ShortBreak => self.short_break_mins,
            Mode::LongBreak => self.long_break_mins,
        }
    }

    /// Configured length of `mode` in seconds.
    pub fn seconds_for(&self, mode: Mode) -> u32 {
        self.minutes_for(mode).saturating_mul(60)
    }
}

/// User-configurable settings, persisted as a flat JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Duration of a work session in minutes.
    pub work_duration: u32,
    /// Duration of a short break in minutes.
    pub short_break_duration: u32,
    /// Duration of a long break in minutes.
    pub long_break_duration: u32,
    /// Number of work sessions before a long break.
    pub long_break_interval: u32,
    /// Whether the next phase starts on its own.
    pub auto_start: bool,
    /// Whether to play a chime on completion.
    pub enable_sound: bool,
    pub theme_mode: ThemeMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_MINS,
            short_break_duration: DEFAULT_SHORT_BREAK_MINS,
            long_break_duration: DEFAULT_LONG_BREAK_MINS,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
            auto_start: DEFAULT_AUTO_START,
            enable_sound: DEFAULT_SOUND_ENABLED,
            theme_mode: ThemeMode::Dark,
        }
    }
}

impl Settings {
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            work_mins: self.work_duration,
            short_break_mins: self.short_break_duration,
            long_break_mins: self.long_break_duration,
            long_break_interval: self.long_break_interval,
            auto_start: self.auto_start,
        }
    }

    /// Copies the values of an accepted settings form.
    pub fn apply(&mut self, input: &SettingsInput) {
        self.work_duration = input.work_mins;
        self.short_break_duration = input.short_break_mins;
        self.long_break_duration = input.long_break_mins;
        self.long_break_interval = input.long_break_interval;
        self.auto_start = input.auto_start;
        self.enable_sound = input.enable_sound;
    }
}

/// Rejected settings form values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u32,
        max: u32,
    },
    #[error("{field} is not a number: {input:?}")]
    NotANumber { field: &'static str, input: String },
}

/// Values entered in the settings form, before they touch the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsInput {
    pub work_mins: u32,
    pub short_break_mins: u32,
    pub long_break_mins: u32,
    pub long_break_interval: u32,
    pub auto_start: bool,
    pub enable_sound: bool,
}

impl SettingsInput {
    /// Prefills the form from the current settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            work_mins: settings.work_duration,
            short_break_mins: settings.short_break_duration,
            long_break_mins: settings.long_break_duration,
            long_break_interval: settings.long_break_interval,
            auto_start: settings.auto_start,
            enable_sound: settings.enable_sound,
        }
    }

    /// Rejects any value outside its range. Nothing is clamped here; the form
    /// stays open instead.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields = [
            (Field::Work, self.work_mins),
            (Field::ShortBreak, self.short_break_mins),
            (Field::LongBreak, self.long_break_mins),
            (Field::Interval, self.long_break_interval),
        ];
        for (field, value) in fields {
            field.check(i64::from(value))?;
        }
        Ok(())
    }
}

/// A numeric field of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Work,
    ShortBreak,
    LongBreak,
    Interval,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Work => "work duration",
            Field::ShortBreak => "short break duration",
            Field::LongBreak => "long break duration",
            Field::Interval => "long break interval",
        }
    }

    pub fn range(self) -> (u32, u32) {
        match self {
            Field::Work => WORK_RANGE,
            Field::ShortBreak => SHORT_BREAK_RANGE,
            Field::LongBreak => LONG_BREAK_RANGE,
            Field::Interval => INTERVAL_RANGE,
        }
    }

    fn check(self, value: i64) -> Result<u32, SettingsError> {
        let (min, max) = self.range();
        if value < i64::from(min) || value > i64::from(max) {
            return Err(SettingsError::OutOfRange {
                field: self.name(),
                value,
                min,
                max,
            });
        }
        // In range, so it fits.
        Ok(value as u32)
    }
}

/// Parses a minutes or count field typed by the user.
pub fn parse_field(field: Field, input: &str) -> Result<u32, SettingsError> {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(value) => field.check(value),
        Err(_) => Err(SettingsError::NotANumber {
            field: field.name(),
            input: trimmed.to_string(),
        }),
    }
}
