//! Terminal front end.
//!
//! A reader thread forwards stdin lines over a channel. The main thread owns
//! the [`App`], waits on that channel until the next tick is due, and redraws
//! a single status line.

use crate::app::{Action, App, CompletionEvent, EventResult};
use crate::audio::AudioPlayer;
use crate::models::{parse_field, Field, Settings, SettingsError, SettingsInput};
use crate::notifications;
use crate::theme::{ColorPalette, Rgb};
use crate::timer::{self, Ticker, TICK_INTERVAL};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";
const BAR_WIDTH: usize = 20;

pub const HELP: &str = "\
Commands:
  s | <enter>        start / pause
  start, pause       start or pause explicitly
  r                  reset the current phase
  rr                 reset the whole flow
  n                  skip to the next phase
  t                  toggle dark / light theme
  m                  toggle sound
  a                  toggle auto start
  set W S L I [auto|manual]
                     set work, short break, long break minutes and rounds
  defaults           restore default settings
  q                  quit
  ?                  show this help";

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command {0:?}, type ? for help")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Action(Action),
    Help,
}

/// Parses one line of user input. `settings` fills in the form fields the
/// `set` command leaves out.
pub fn parse_command(line: &str, settings: &Settings) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Action(Action::ToggleRunning));
    };

    let action = match head.to_ascii_lowercase().as_str() {
        "s" | "toggle" => Action::ToggleRunning,
        "start" => Action::Start,
        "pause" | "p" => Action::Pause,
        "r" | "reset" => Action::Reset,
        "rr" | "reset-flow" => Action::ResetFlow,
        "n" | "skip" => Action::Skip,
        "t" | "theme" => Action::ToggleTheme,
        "m" | "sound" => Action::ToggleSound,
        "a" | "auto" => Action::ToggleAutoStart,
        "defaults" => Action::RestoreDefaults,
        "q" | "quit" | "exit" => Action::Quit,
        "?" | "h" | "help" => return Ok(Command::Help),
        "set" => Action::UpdateSettings(parse_set(words.collect(), settings)?),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Command::Action(action))
}

fn parse_set(args: Vec<&str>, settings: &Settings) -> Result<SettingsInput, CommandError> {
    const USAGE: &str = "set <work> <short> <long> <interval> [auto|manual]";
    if !(4..=5).contains(&args.len()) {
        return Err(CommandError::Usage(USAGE));
    }

    let mut input = SettingsInput::from_settings(settings);
    input.work_mins = parse_field(Field::Work, args[0])?;
    input.short_break_mins = parse_field(Field::ShortBreak, args[1])?;
    input.long_break_mins = parse_field(Field::LongBreak, args[2])?;
    input.long_break_interval = parse_field(Field::Interval, args[3])?;
    if let Some(flag) = args.get(4) {
        input.auto_start = match *flag {
            "auto" => true,
            "manual" => false,
            _ => return Err(CommandError::Usage(USAGE)),
        };
    }
    Ok(input)
}

fn paint(color: Rgb, text: &str) -> String {
    format!("{}{}{}", color.ansi_fg(), text, RESET)
}

/// The status line, coloured with `palette`.
pub fn render_status(app: &App, palette: &ColorPalette) -> String {
    let engine = &app.engine;
    let accent = palette.accent(engine.mode());

    let progress = timer::format_progress(engine.progress_ratio(), BAR_WIDTH);
    let (bar, percent) = progress.split_once("  ").unwrap_or((progress.as_str(), ""));
    let filled = bar.chars().filter(|c| *c == '█').count();
    let bar = format!(
        "{}{}",
        paint(accent, &"█".repeat(filled)),
        paint(palette.progress_bg, &"░".repeat(BAR_WIDTH - filled))
    );

    let dots = timer::format_dots(&engine.progress_dots());
    let (done, pending) = dots.split_at(dots.rfind('●').map_or(0, |i| i + '●'.len_utf8()));

    let state = if engine.is_running() {
        paint(palette.text_secondary, "running")
    } else {
        paint(palette.warning, "paused")
    };

    format!(
        "{}{}  {}  {} {}  {}{}  {}{}",
        palette.bg_primary.ansi_bg(),
        paint(accent, engine.mode().label()),
        paint(palette.text_primary, &engine.formatted_time()),
        bar,
        paint(palette.text_muted, percent),
        paint(accent, done),
        paint(palette.text_muted, pending),
        state,
        RESET
    )
}

fn completion_line(event: &CompletionEvent, palette: &ColorPalette) -> String {
    let mut line = format!(
        "{} finished, up next: {}",
        event.finished.label(),
        event.next.label()
    );
    if event.auto_started {
        line.push_str(" (started)");
    }
    paint(palette.success, &line)
}

fn read_commands(tx: Sender<String>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stdin");
                break;
            }
        }
    }
    debug!("stdin closed");
}

/// Runs the console front end until the user quits or stdin closes.
pub fn run(mut app: App) -> io::Result<()> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || read_commands(tx));

    let audio = AudioPlayer::new()
        .map_err(|e| warn!(error = %e, "Audio unavailable"))
        .ok();
    let mut ticker = Ticker::new(Instant::now(), TICK_INTERVAL);
    let mut out = io::stdout();

    writeln!(out, "{}", HELP)?;
    draw(&mut out, &app)?;

    loop {
        match rx.recv_timeout(ticker.remaining(Instant::now())) {
            Ok(line) => {
                let palette = app.palette();
                match parse_command(&line, &app.settings) {
                    Ok(Command::Help) => writeln!(out, "{}{}", CLEAR_LINE, HELP)?,
                    Ok(Command::Action(action)) => match app.handle(action) {
                        EventResult::Quit => break,
                        EventResult::StateChangedWithCompletion(event) => {
                            writeln!(out, "{}{}", CLEAR_LINE, completion_line(&event, palette))?;
                            notifications::alert_completion(&app.settings, audio.as_ref(), event);
                        }
                        EventResult::SettingsChanged => {
                            writeln!(
                                out,
                                "{}{}",
                                CLEAR_LINE,
                                paint(app.palette().success, "Settings saved")
                            )?;
                        }
                        EventResult::StateChanged | EventResult::Continue => {}
                    },
                    Err(e) => {
                        writeln!(out, "{}{}", CLEAR_LINE, paint(palette.error, &e.to_string()))?
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for _ in 0..ticker.poll(Instant::now()) {
            if let (_, Some(event)) = app.tick() {
                let line = completion_line(&event, app.palette());
                writeln!(out, "{}{}", CLEAR_LINE, line)?;
                notifications::alert_completion(&app.settings, audio.as_ref(), event);
            }
        }
        draw(&mut out, &app)?;
    }

    writeln!(out)?;
    Ok(())
}

fn draw(out: &mut impl Write, app: &App) -> io::Result<()> {
    write!(
        out,
        "{}{}  {}",
        CLEAR_LINE,
        render_status(app, app.palette()),
        timer::format_title(&app.engine)
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;
    use crate::persistence::SettingsStore;
    use crate::theme;
    use tempfile::TempDir;

    fn parse(line: &str) -> Result<Command, CommandError> {
        parse_command(line, &Settings::default())
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse(""), Ok(Command::Action(Action::ToggleRunning)));
        assert_eq!(parse("  s "), Ok(Command::Action(Action::ToggleRunning)));
        assert_eq!(parse("r"), Ok(Command::Action(Action::Reset)));
        assert_eq!(parse("rr"), Ok(Command::Action(Action::ResetFlow)));
        assert_eq!(parse("N"), Ok(Command::Action(Action::Skip)));
        assert_eq!(parse("theme"), Ok(Command::Action(Action::ToggleTheme)));
        assert_eq!(parse("q"), Ok(Command::Action(Action::Quit)));
        assert_eq!(parse("?"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("jump"), Err(CommandError::Unknown("jump".to_string())));
    }

    #[test]
    fn test_parse_set() {
        let settings = Settings {
            enable_sound: false,
            ..Settings::default()
        };
        let command = parse_command("set 10 2 3 2 auto", &settings).unwrap();
        assert_eq!(
            command,
            Command::Action(Action::UpdateSettings(SettingsInput {
                work_mins: 10,
                short_break_mins: 2,
                long_break_mins: 3,
                long_break_interval: 2,
                auto_start: true,
                enable_sound: false,
            }))
        );
    }

    #[test]
    fn test_parse_set_keeps_auto_start_when_omitted() {
        let settings = Settings {
            auto_start: true,
            ..Settings::default()
        };
        match parse_command("set 30 5 15 4", &settings).unwrap() {
            Command::Action(Action::UpdateSettings(input)) => assert!(input.auto_start),
            other => panic!("Expected settings update, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_set_rejects_bad_input() {
        assert!(matches!(parse("set 10 2 3"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("set 10 2 3 2 maybe"), Err(CommandError::Usage(_))));
        assert!(matches!(
            parse("set 0 2 3 2"),
            Err(CommandError::Settings(SettingsError::OutOfRange { .. }))
        ));
        assert!(matches!(
            parse("set ten 2 3 2"),
            Err(CommandError::Settings(SettingsError::NotANumber { .. }))
        ));
    }

    #[test]
    fn test_parse_set_rejects_values_above_range() {
        assert!(matches!(
            parse("set 91 5 15 4"),
            Err(CommandError::Settings(SettingsError::OutOfRange {
                field: "work duration",
                value: 91,
                ..
            }))
        ));
        assert!(matches!(
            parse("set 25 5 15 11"),
            Err(CommandError::Settings(SettingsError::OutOfRange {
                field: "long break interval",
                value: 11,
                ..
            }))
        ));
        assert!(matches!(
            parse("set 1 1 1 4294967295"),
            Err(CommandError::Settings(SettingsError::OutOfRange { .. }))
        ));
        assert!(parse("set 90 30 60 10").is_ok());
    }

    #[test]
    fn test_render_status() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(SettingsStore::new(dir.path().join("settings.json")));

        let line = render_status(&app, &theme::DARK);
        assert!(line.contains("FOCUS TIME"));
        assert!(line.contains("25:00"));
        assert!(line.contains("paused"));
        assert!(line.contains(&theme::DARK.work.ansi_fg()));
        assert!(line.ends_with(RESET));

        app.handle(Action::Skip);
        app.handle(Action::Start);
        let line = render_status(&app, &theme::LIGHT);
        assert!(line.contains("SHORT BREAK"));
        assert!(line.contains("running"));
        assert!(line.contains("●"));
        assert!(line.contains(&theme::LIGHT.bg_primary.ansi_bg()));
    }

    #[test]
    fn test_completion_line() {
        let mut event = CompletionEvent {
            finished: Mode::Work,
            next: Mode::LongBreak,
            completed_work: 4,
            auto_started: false,
        };
        let line = completion_line(&event, &theme::DARK);
        assert!(line.contains("FOCUS TIME finished, up next: LONG BREAK"));
        assert!(!line.contains("(started)"));

        event.auto_started = true;
        assert!(completion_line(&event, &theme::DARK).contains("(started)"));
    }
}
