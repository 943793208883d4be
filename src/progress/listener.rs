use colored::Colorize;
use log::info;

use super::event::{ProgressEvent, UNKNOWN_REMAINING};

/// Sink for progress events.
///
/// Listeners are driven from a single reporter thread, so they keep plain
/// mutable state.
pub trait ProgressListener: Send {
    fn on_progress(&mut self, event: &ProgressEvent);
}

/// Logs progress lines to the console
#[derive(Debug, Default)]
pub struct ConsoleProgressListener;

impl ProgressListener for ConsoleProgressListener {
    fn on_progress(&mut self, event: &ProgressEvent) {
        info!(
            "  → {}: {} (remaining {})",
            event.job_name.bold(),
            format_percent(event.percent),
            format_remaining(event.remaining_millis)
        );
    }
}

fn format_percent(percent: u8) -> String {
    let text = format!("{:>3}%", percent);
    if percent == 100 {
        text.green().to_string()
    } else {
        text.cyan().to_string()
    }
}

fn format_remaining(millis: i64) -> String {
    if millis == UNKNOWN_REMAINING {
        return "unknown".to_string();
    }
    let seconds = millis / 1000;
    format!("{}m {:02}s", seconds / 60, seconds % 60)
}

/// Keeps every event it receives
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Vec<ProgressEvent>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ProgressEvent> {
        self.events
    }
}

impl ProgressListener for RecordingListener {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}

/// Discards all events
#[derive(Debug, Default)]
pub struct NoopListener;

impl ProgressListener for NoopListener {
    fn on_progress(&mut self, _event: &ProgressEvent) {}
}
