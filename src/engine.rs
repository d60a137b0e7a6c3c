//! Countdown state machine for work and break phases.
//!
//! The engine never reads the clock. Whoever owns it calls [`TimerEngine::tick`]
//! once per second and forwards user actions to the other mutators.

use crate::models::{Mode, TimerConfig};
use tracing::debug;

/// Receives engine notifications, synchronously, on the mutating thread.
pub trait TimerObserver {
    /// One second was counted down.
    fn on_tick(&mut self) {}
    /// A phase finished, either naturally or through a skip.
    fn on_complete(&mut self, _previous: Mode) {}
    /// The engine switched to `mode` and reloaded its duration.
    fn on_mode_change(&mut self, _mode: Mode) {}
}

/// Observer that ignores everything.
impl TimerObserver for () {}

/// Result of a single [`TimerEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is paused; nothing changed.
    Idle,
    /// One second was counted down.
    Ticked,
    /// The phase given here finished and the next one was loaded.
    Completed(Mode),
}

/// One marker of the round indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMarker {
    Done,
    Pending,
}

pub struct TimerEngine<O: TimerObserver = ()> {
    config: TimerConfig,
    mode: Mode,
    time_left_secs: u32,
    total_secs: u32,
    running: bool,
    completed_work_count: u32,
    observer: O,
}

impl TimerEngine<()> {
    /// Creates an engine without a subscriber.
    #[cfg(test)]
    pub fn unobserved(config: TimerConfig) -> Self {
        Self::new(config, ())
    }
}

impl<O: TimerObserver> TimerEngine<O> {
    /// Creates a paused engine at the start of a work session.
    pub fn new(config: TimerConfig, observer: O) -> Self {
        let total_secs = config.seconds_for(Mode::Work);
        Self {
            config,
            mode: Mode::Work,
            time_left_secs: total_secs,
            total_secs,
            running: false,
            completed_work_count: 0,
            observer,
        }
    }

    #[cfg(test)]
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    #[cfg(test)]
    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_count(&self) -> u32 {
        self.completed_work_count
    }

    #[cfg(test)]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stops and rewinds the current phase. Mode and round count are kept.
    pub fn reset(&mut self) {
        self.running = false;
        self.total_secs = self.config.seconds_for(self.mode);
        self.time_left_secs = self.total_secs;
    }

    /// Stops and starts over from the first work session of a round.
    pub fn reset_flow(&mut self) {
        self.completed_work_count = 0;
        self.running = false;
        self.switch_mode(Mode::Work);
    }

    /// Finishes the current phase right away.
    pub fn skip(&mut self) {
        self.running = false;
        self.time_left_secs = 0;
        self.complete();
    }

    /// Advances the countdown by one second.
    ///
    /// Reaching zero does not complete the phase. The next tick does, so the
    /// display rests on `00:00` for a full second first.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        if self.time_left_secs > 0 {
            self.time_left_secs -= 1;
            self.observer.on_tick();
            TickOutcome::Ticked
        } else {
            TickOutcome::Completed(self.complete())
        }
    }

    /// Replaces the timing parameters and resets the flow.
    pub fn reconfigure(&mut self, config: TimerConfig) {
        self.config = config;
        self.reset_flow();
    }

    /// Fraction of the current phase already elapsed, in `0.0..=1.0`.
    pub fn progress_ratio(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        let elapsed = self.total_secs.saturating_sub(self.time_left_secs);
        (f64::from(elapsed) / f64::from(self.total_secs)).clamp(0.0, 1.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        crate::timer::format_time(self.time_left_secs)
    }

    /// Work sessions done in the current round, then the ones still ahead.
    pub fn progress_dots(&self) -> Vec<RoundMarker> {
        let interval = self.interval();
        let filled = self.completed_work_count % interval;
        let mut dots = vec![RoundMarker::Done; filled as usize];
        dots.resize(interval as usize, RoundMarker::Pending);
        dots
    }

    /// Where the current mode ends up after it completes.
    fn next_mode(&self) -> Mode {
        match self.mode {
            Mode::Work if self.completed_work_count % self.interval() == 0 => Mode::LongBreak,
            Mode::Work => Mode::ShortBreak,
            Mode::ShortBreak | Mode::LongBreak => Mode::Work,
        }
    }

    fn interval(&self) -> u32 {
        self.config.long_break_interval.max(1)
    }

    fn complete(&mut self) -> Mode {
        self.running = false;
        let completed = self.mode;

        if completed == Mode::Work {
            self.completed_work_count += 1;
        }
        let next = self.next_mode();
        debug!(
            completed = %completed,
            next = %next,
            completed_work = self.completed_work_count,
            "phase complete"
        );
        self.switch_mode(next);
        self.observer.on_complete(completed);

        if self.config.auto_start {
            self.start();
        }
        completed
    }

    fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.total_secs = self.config.seconds_for(mode);
        self.time_left_secs = self.total_secs;
        self.observer.on_mode_change(mode);
    }
}
