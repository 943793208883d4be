use std::time::{Duration, Instant};

use super::event::{ProgressEvent, UNKNOWN_REMAINING};

/// Counts completed units of one job and derives percent and ETA
pub struct ProgressTracker {
    job_name: String,
    total: usize,
    completed: usize,
    started: Instant,
}

impl ProgressTracker {
    pub fn new(job_name: impl Into<String>, total: usize) -> Self {
        Self {
            job_name: job_name.into(),
            total,
            completed: 0,
            started: Instant::now(),
        }
    }

    pub fn start_event(&self) -> ProgressEvent {
        ProgressEvent::new(&self.job_name, 0, UNKNOWN_REMAINING)
    }

    pub fn finish_event(&self) -> ProgressEvent {
        ProgressEvent::new(&self.job_name, 100, 0)
    }

    pub fn record_completion(&mut self) -> ProgressEvent {
        self.completed = (self.completed + 1).min(self.total);
        self.current_event(self.started.elapsed())
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn current_event(&self, elapsed: Duration) -> ProgressEvent {
        let percent = calculate_percent(self.completed, self.total);
        let remaining = estimate_remaining_millis(elapsed, self.completed, self.total);
        ProgressEvent::new(&self.job_name, percent, remaining)
    }
}

fn calculate_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (completed * 100 / total) as u8
}

fn estimate_remaining_millis(elapsed: Duration, completed: usize, total: usize) -> i64 {
    if completed == 0 {
        return UNKNOWN_REMAINING;
    }
    let pending = total.saturating_sub(completed) as u128;
    let per_unit = elapsed.as_millis() / completed as u128;
    (per_unit * pending).min(i64::MAX as u128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_uses_integer_division() {
        assert_eq!(calculate_percent(0, 3), 0);
        assert_eq!(calculate_percent(1, 3), 33);
        assert_eq!(calculate_percent(2, 3), 66);
        assert_eq!(calculate_percent(3, 3), 100);
        assert_eq!(calculate_percent(0, 0), 100);
    }

    #[test]
    fn test_remaining_time_scales_with_pending_work() {
        let elapsed = Duration::from_millis(400);

        assert_eq!(estimate_remaining_millis(elapsed, 0, 10), UNKNOWN_REMAINING);
        assert_eq!(estimate_remaining_millis(elapsed, 4, 10), 600);
        assert_eq!(estimate_remaining_millis(elapsed, 10, 10), 0);
    }

    #[test]
    fn test_tracker_reaches_hundred_percent() {
        let mut tracker = ProgressTracker::new("job", 2);

        assert!(tracker.start_event().is_start());
        assert_eq!(tracker.record_completion().percent, 50);
        let last = tracker.record_completion();

        assert!(last.is_finished());
        assert_eq!(last.remaining_millis, 0);
        assert_eq!(tracker.completed(), tracker.total());
    }
}
