//! Tick cadence and text formatting for timer displays.

use crate::engine::{RoundMarker, TimerEngine, TimerObserver};
use std::time::{Duration, Instant};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed-rate schedule for calling [`TimerEngine::tick`].
///
/// Deadlines advance by whole periods from the first one, so a late wakeup
/// does not push every later tick back.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    next: Instant,
    period: Duration,
}

impl Ticker {
    pub fn new(now: Instant, period: Duration) -> Self {
        Self {
            next: now + period,
            period,
        }
    }

    /// Deadline of the next tick.
    #[cfg(any(target_os = "macos", test))]
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Time left until the next tick is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Returns how many ticks are due at `now` and moves the deadline past it.
    /// After a long stall (system sleep) at most one tick is reported and the
    /// schedule restarts from `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        let behind = now.duration_since(self.next);
        if behind >= self.period * 5 {
            self.next = now + self.period;
            return 1;
        }
        let mut due = 0;
        while self.next <= now {
            self.next += self.period;
            due += 1;
        }
        due
    }
}

/// Formats time in MM:SS format.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Window or tray title.
pub fn format_title<O: TimerObserver>(engine: &TimerEngine<O>) -> String {
    format!("Pomocus - {}", engine.formatted_time())
}

/// Compact tray title: a mode glyph and the remaining time.
#[cfg(any(target_os = "macos", test))]
pub fn format_tray_title<O: TimerObserver>(engine: &TimerEngine<O>) -> String {
    let glyph = if engine.mode().is_break() { "☕" } else { "🍅" };
    if engine.is_running() {
        format!("{} {}", glyph, engine.formatted_time())
    } else {
        format!("⏸ {}", engine.formatted_time())
    }
}

/// Formats the status line: mode heading, remaining time and run state.
#[cfg(any(target_os = "macos", test))]
pub fn format_status<O: TimerObserver>(engine: &TimerEngine<O>) -> String {
    let state = if engine.is_running() {
        "running"
    } else {
        "paused"
    };
    format!(
        "{}  {}  ({})",
        engine.mode().label(),
        engine.formatted_time(),
        state
    )
}

/// Formats a progress bar of the given width.
pub fn format_progress(ratio: f64, width: usize) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!(
        "{}{}  {}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        (ratio * 100.0).round() as u32
    )
}

/// Round indicator, e.g. `● ● ○ ○`.
pub fn format_dots(dots: &[RoundMarker]) -> String {
    dots.iter()
        .map(|dot| match dot {
            RoundMarker::Done => "●",
            RoundMarker::Pending => "○",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimerConfig;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(125), "02:05");
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(5400), "90:00");
    }

    #[test]
    fn test_format_title() {
        let engine = TimerEngine::unobserved(TimerConfig::default());
        assert_eq!(format_title(&engine), "Pomocus - 25:00");
    }

    #[test]
    fn test_format_tray_title() {
        let mut engine = TimerEngine::unobserved(TimerConfig::default());
        assert_eq!(format_tray_title(&engine), "⏸ 25:00");

        engine.start();
        engine.tick();
        assert_eq!(format_tray_title(&engine), "🍅 24:59");

        engine.skip();
        engine.start();
        assert_eq!(format_tray_title(&engine), "☕ 05:00");
    }

    #[test]
    fn test_format_status() {
        let mut engine = TimerEngine::unobserved(TimerConfig::default());
        assert_eq!(format_status(&engine), "FOCUS TIME  25:00  (paused)");
        engine.skip();
        engine.start();
        assert_eq!(format_status(&engine), "SHORT BREAK  05:00  (running)");
    }

    #[test]
    fn test_format_progress() {
        assert_eq!(format_progress(0.0, 20), "░░░░░░░░░░░░░░░░░░░░  0%");
        assert_eq!(format_progress(0.5, 20), "██████████░░░░░░░░░░  50%");
        assert_eq!(format_progress(1.0, 20), "████████████████████  100%");
        assert_eq!(format_progress(1.7, 4), "████  100%");
    }

    #[test]
    fn test_format_dots() {
        let dots = [
            RoundMarker::Done,
            RoundMarker::Done,
            RoundMarker::Pending,
            RoundMarker::Pending,
        ];
        assert_eq!(format_dots(&dots), "● ● ○ ○");
        assert_eq!(format_dots(&[]), "");
    }

    #[test]
    fn test_ticker_not_due_before_deadline() {
        let start = Instant::now();
        let mut ticker = Ticker::new(start, TICK_INTERVAL);
        assert_eq!(ticker.poll(start), 0);
        assert_eq!(ticker.poll(start + Duration::from_millis(999)), 0);
        assert_eq!(ticker.remaining(start), TICK_INTERVAL);
    }

    #[test]
    fn test_ticker_fixed_rate() {
        let start = Instant::now();
        let mut ticker = Ticker::new(start, TICK_INTERVAL);

        assert_eq!(ticker.poll(start + Duration::from_millis(1200)), 1);
        assert_eq!(ticker.deadline(), start + Duration::from_secs(2));

        assert_eq!(ticker.poll(start + Duration::from_millis(3100)), 2);
        assert_eq!(ticker.deadline(), start + Duration::from_secs(4));
    }

    #[test]
    fn test_ticker_restarts_after_stall() {
        let start = Instant::now();
        let mut ticker = Ticker::new(start, TICK_INTERVAL);
        let late = start + Duration::from_secs(600);

        assert_eq!(ticker.poll(late), 1);
        assert_eq!(ticker.deadline(), late + TICK_INTERVAL);
    }
}
