//! Desktop notifications for finished phases.

use crate::app::CompletionEvent;
use crate::audio::AudioPlayer;
use crate::models::{Mode, Settings};
use notify_rust::Notification;
use std::thread;
use tracing::warn;

/// Summary and body text for a completion.
pub fn completion_message(event: &CompletionEvent, next_mins: u32) -> (String, String) {
    if event.finished.is_break() {
        return (
            "Break Over! ☕".to_string(),
            "Ready to start another focus session?".to_string(),
        );
    }
    match event.next {
        Mode::LongBreak => (
            "Long Break Time! 🎉".to_string(),
            format!(
                "You've earned a {} minute break. Great job staying focused!",
                next_mins
            ),
        ),
        _ => {
            let sessions = if event.completed_work == 1 {
                "1 focus session".to_string()
            } else {
                format!("{} focus sessions", event.completed_work)
            };
            (
                "Focus Session Complete! 🍅".to_string(),
                format!(
                    "Great work! You've completed {}.\nTake a {} minute break.",
                    sessions, next_mins
                ),
            )
        }
    }
}

/// Shows a notification for a completed phase.
/// Runs in a background thread to avoid blocking the tick loop.
pub fn notify_completion(event: CompletionEvent, next_mins: u32) {
    let (summary, body) = completion_message(&event, next_mins);
    thread::spawn(move || {
        if let Err(e) = Notification::new()
            .summary(&summary)
            .body(&body)
            .appname("Pomocus")
            .show()
        {
            warn!(error = %e, "Failed to show notification");
        }
    });
}

/// Chime (when enabled) and notify for a completed phase.
pub fn alert_completion(settings: &Settings, audio: Option<&AudioPlayer>, event: CompletionEvent) {
    if settings.enable_sound {
        if let Some(audio) = audio {
            audio.play_chime();
        }
    }
    let next_mins = settings.timer_config().minutes_for(event.next);
    notify_completion(event, next_mins);
}
