//! JSON file persistence for user settings.

use crate::models::{
    Settings, ThemeMode, INTERVAL_RANGE, LONG_BREAK_RANGE, SHORT_BREAK_RANGE, WORK_RANGE,
};
use crate::theme::{self, ColorPalette};
use directories::ProjectDirs;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

const SETTINGS_FILE: &str = "pomocus_settings.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to create settings directory {0}")]
    DirectoryCreation(PathBuf),
}

/// The settings file as found on disk. Every key is optional and untyped so a
/// single bad value never throws away the rest.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    work_duration: Option<Value>,
    short_break_duration: Option<Value>,
    long_break_duration: Option<Value>,
    long_break_interval: Option<Value>,
    auto_start: Option<Value>,
    enable_sound: Option<Value>,
    theme_mode: Option<Value>,
}

impl RawSettings {
    fn sanitize(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            work_duration: clamp_int(&self.work_duration, WORK_RANGE, defaults.work_duration),
            short_break_duration: clamp_int(
                &self.short_break_duration,
                SHORT_BREAK_RANGE,
                defaults.short_break_duration,
            ),
            long_break_duration: clamp_int(
                &self.long_break_duration,
                LONG_BREAK_RANGE,
                defaults.long_break_duration,
            ),
            long_break_interval: clamp_int(
                &self.long_break_interval,
                INTERVAL_RANGE,
                defaults.long_break_interval,
            ),
            auto_start: as_bool(&self.auto_start, defaults.auto_start),
            enable_sound: as_bool(&self.enable_sound, defaults.enable_sound),
            theme_mode: self
                .theme_mode
                .as_ref()
                .and_then(Value::as_str)
                .and_then(ThemeMode::parse)
                .unwrap_or(defaults.theme_mode),
        }
    }
}

/// Reads an integer-ish value and clamps it into `range`. Booleans count as
/// 1 and 0.
fn clamp_int(value: &Option<Value>, (min, max): (u32, u32), fallback: u32) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        _ => None,
    };
    match parsed {
        Some(n) => n.clamp(i64::from(min), i64::from(max)) as u32,
        None => fallback,
    }
}

fn as_bool(value: &Option<Value>, fallback: bool) -> bool {
    value.as_ref().and_then(Value::as_bool).unwrap_or(fallback)
}

/// Loads and saves [`Settings`] as a single JSON file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config directory.
    pub fn with_default_path() -> Self {
        Self::new(Self::default_path())
    }

    fn default_path() -> PathBuf {
        ProjectDirs::from("com", "pomocus", "Pomocus")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads settings, substituting defaults for anything missing or invalid.
    /// Never fails: an unreadable or corrupt file yields [`Settings::default`].
    pub fn load(&self) -> Settings {
        match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable settings file");
                Settings::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<Settings>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let object: Map<String, Value> = serde_json::from_str(&contents)?;
        let raw: RawSettings = serde_json::from_value(Value::Object(object))?;
        Ok(Some(raw.sanitize()))
    }

    /// Rewrites the whole settings file.
    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|_| StoreError::DirectoryCreation(parent.to_path_buf()))?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "Saved settings");
        Ok(())
    }

    /// Palette for the given theme mode.
    pub fn theme(&self, mode: ThemeMode) -> &'static ColorPalette {
        theme::palette(mode)
    }

    /// Flips between dark and light, persists the choice and returns the new palette.
    /// A failed write is logged; the in-memory settings keep the new theme.
    pub fn toggle_theme(&self, settings: &mut Settings) -> &'static ColorPalette {
        settings.theme_mode = settings.theme_mode.toggled();
        if let Err(e) = self.save(settings) {
            error!(error = %e, "Failed to save theme");
        }
        self.theme(settings.theme_mode)
    }

    /// Writes the default settings and returns them.
    pub fn reset_to_defaults(&self) -> Result<Settings, StoreError> {
        let settings = Settings::default();
        self.save(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join(SETTINGS_FILE))
    }

    fn load_json(json: &str) -> Settings {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), json).unwrap();
        store.load()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load(), Settings::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_settings_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let custom = Settings {
            work_duration: 30,
            short_break_duration: 10,
            long_break_duration: 20,
            long_break_interval: 3,
            auto_start: true,
            enable_sound: false,
            theme_mode: ThemeMode::Light,
        };
        store.save(&custom).unwrap();

        assert_eq!(store.load(), custom);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("deeper").join("s.json"));
        store.save(&Settings::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_saved_file_is_flat_pretty_json() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Settings::default()).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("\n  \"work_duration\": 25"));
        assert!(contents.contains("\"theme_mode\": \"dark\""));
    }

    #[test]
    fn test_settings_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .save(&Settings {
                work_duration: 30,
                ..Settings::default()
            })
            .unwrap();
        store
            .save(&Settings {
                work_duration: 45,
                ..Settings::default()
            })
            .unwrap();

        assert_eq!(store.load().work_duration, 45);
    }

    #[test]
    fn test_clamps_out_of_range_values() {
        let settings = load_json(r#"{"work_duration": 999}"#);
        assert_eq!(settings.work_duration, 90);
        assert_eq!(settings.short_break_duration, 5);

        let settings = load_json(
            r#"{"work_duration": 0, "short_break_duration": 99, "long_break_duration": -3, "long_break_interval": 50}"#,
        );
        assert_eq!(settings.work_duration, 1);
        assert_eq!(settings.short_break_duration, 30);
        assert_eq!(settings.long_break_duration, 1);
        assert_eq!(settings.long_break_interval, 10);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_dark() {
        assert_eq!(load_json(r#"{"theme_mode": "purple"}"#).theme_mode, ThemeMode::Dark);
        assert_eq!(load_json(r#"{"theme_mode": 3}"#).theme_mode, ThemeMode::Dark);
        assert_eq!(load_json(r#"{"theme_mode": "light"}"#).theme_mode, ThemeMode::Light);
    }

    #[test]
    fn test_lenient_integer_forms() {
        let settings = load_json(r#"{"work_duration": "40", "short_break_duration": 7.9}"#);
        assert_eq!(settings.work_duration, 40);
        assert_eq!(settings.short_break_duration, 7);

        let settings = load_json(r#"{"work_duration": "soon", "long_break_interval": null}"#);
        assert_eq!(settings.work_duration, 25);
        assert_eq!(settings.long_break_interval, 4);
    }

    #[test]
    fn test_boolean_durations_count_as_integers() {
        let settings = load_json(r#"{"work_duration": true, "long_break_interval": false}"#);
        assert_eq!(settings.work_duration, 1);
        assert_eq!(settings.long_break_interval, 1);
    }

    #[test]
    fn test_malformed_booleans_fall_back() {
        let settings = load_json(r#"{"auto_start": "yes", "enable_sound": 0}"#);
        assert!(!settings.auto_start);
        assert!(settings.enable_sound);

        let settings = load_json(r#"{"auto_start": true, "enable_sound": false}"#);
        assert!(settings.auto_start);
        assert!(!settings.enable_sound);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let settings = load_json(r#"{"long_break_interval": 6, "window_x": 120}"#);
        assert_eq!(settings.long_break_interval, 6);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        assert_eq!(load_json("{ not json"), Settings::default());
        assert_eq!(load_json("[1, 2, 3]"), Settings::default());
        assert_eq!(load_json(""), Settings::default());
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let store = SettingsStore::new(blocker.join(SETTINGS_FILE));
        let result = store.save(&Settings::default());
        assert!(matches!(result, Err(StoreError::DirectoryCreation(_))));
    }

    #[test]
    fn test_toggle_theme_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut settings = Settings::default();

        let palette = store.toggle_theme(&mut settings);
        assert_eq!(settings.theme_mode, ThemeMode::Light);
        assert_eq!(palette, &theme::LIGHT);
        assert_eq!(store.load().theme_mode, ThemeMode::Light);

        let palette = store.toggle_theme(&mut settings);
        assert_eq!(palette, &theme::DARK);
        assert_eq!(store.load().theme_mode, ThemeMode::Dark);
    }

    #[test]
    fn test_reset_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .save(&Settings {
                work_duration: 50,
                theme_mode: ThemeMode::Light,
                ..Settings::default()
            })
            .unwrap();

        let settings = store.reset_to_defaults().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(store.load(), Settings::default());
    }
}
