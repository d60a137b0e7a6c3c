//! Pomocus - a desktop Pomodoro focus timer.
//!
//! Alternates focus sessions with short breaks and inserts a long break after
//! a configurable number of sessions. Settings live in a small JSON file.

use clap::Parser;
use std::path::PathBuf;

mod app;
mod audio;
mod console;
mod engine;
#[cfg(any(target_os = "macos", test))]
mod event;
#[cfg(target_os = "macos")]
mod menu;
#[cfg(target_os = "macos")]
mod menubar;
mod models;
mod notifications;
mod persistence;
mod theme;
mod timer;
#[cfg(any(target_os = "macos", test))]
mod tray;

use app::App;
use persistence::SettingsStore;

#[derive(Parser, Debug)]
#[command(name = "pomocus", version, about = "A Pomodoro focus timer")]
struct Cli {
    /// Settings file to load and save instead of the per-user default
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Use the terminal front end even where the menubar is available
    #[arg(long)]
    console: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn use_menubar(&self) -> bool {
        cfg!(target_os = "macos") && !self.console
    }

    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    let store = match cli.settings {
        Some(ref path) => SettingsStore::new(path),
        None => SettingsStore::with_default_path(),
    };
    let app = App::new(store);

    if cli.use_menubar() {
        #[cfg(target_os = "macos")]
        return menubar::run(app);
    }

    console::run(app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["pomocus"]);
        assert!(cli.settings.is_none());
        assert!(!cli.console);
        assert_eq!(cli.use_menubar(), cfg!(target_os = "macos"));
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_cli_parse_settings_path() {
        let cli = Cli::parse_from(["pomocus", "--settings", "/tmp/p.json", "--console"]);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/p.json")));
        assert!(cli.console);
        assert!(!cli.use_menubar());
    }

    #[test]
    fn test_cli_verbosity() {
        assert_eq!(Cli::parse_from(["pomocus", "-v"]).log_level(), "info");
        assert_eq!(Cli::parse_from(["pomocus", "-vv"]).log_level(), "debug");
        assert_eq!(Cli::parse_from(["pomocus", "-vvv"]).log_level(), "debug");
    }
}
