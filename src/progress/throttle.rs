use std::time::{Duration, Instant};

use super::event::ProgressEvent;
use super::listener::ProgressListener;

/// Forwards a subset of events to the wrapped listener.
///
/// An event passes when its job differs from the last forwarded one, when it
/// is a new 0% or 100% mark, or when its percent changed and at least
/// `min_interval` went by since the last forwarded event.
pub struct ThrottledListener<L> {
    inner: L,
    min_interval: Duration,
    last: Option<Emitted>,
}

struct Emitted {
    job_name: String,
    percent: u8,
    at: Instant,
}

impl<L: ProgressListener> ThrottledListener<L> {
    pub fn new(inner: L, min_interval: Duration) -> Self {
        Self {
            inner,
            min_interval,
            last: None,
        }
    }

    pub fn into_inner(self) -> L {
        self.inner
    }

    fn should_emit(&self, event: &ProgressEvent, now: Instant) -> bool {
        let Some(last) = &self.last else {
            return true;
        };

        if last.job_name != event.job_name {
            return true;
        }
        if last.percent == event.percent {
            return false;
        }
        if event.is_start() || event.is_finished() {
            return true;
        }
        now.duration_since(last.at) >= self.min_interval
    }

    fn offer(&mut self, event: &ProgressEvent, now: Instant) {
        if !self.should_emit(event, now) {
            return;
        }
        self.inner.on_progress(event);
        self.last = Some(Emitted {
            job_name: event.job_name.clone(),
            percent: event.percent,
            at: now,
        });
    }
}

impl<L: ProgressListener> ProgressListener for ThrottledListener<L> {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.offer(event, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RecordingListener;

    fn event(job: &str, percent: u8) -> ProgressEvent {
        ProgressEvent::new(job, percent, 0)
    }

    fn forwarded(listener: ThrottledListener<RecordingListener>) -> Vec<(String, u8)> {
        listener
            .into_inner()
            .into_events()
            .into_iter()
            .map(|e| (e.job_name, e.percent))
            .collect()
    }

    #[test]
    fn test_intermediate_events_are_coalesced() {
        let mut listener = ThrottledListener::new(RecordingListener::new(), Duration::from_secs(60));
        let now = Instant::now();

        for percent in [0, 10, 20, 30, 100] {
            listener.offer(&event("job", percent), now);
        }

        assert_eq!(
            forwarded(listener),
            vec![("job".to_string(), 0), ("job".to_string(), 100)]
        );
    }

    #[test]
    fn test_changed_percent_passes_after_interval() {
        let mut listener = ThrottledListener::new(RecordingListener::new(), Duration::from_millis(100));
        let start = Instant::now();

        listener.offer(&event("job", 0), start);
        listener.offer(&event("job", 10), start + Duration::from_millis(50));
        listener.offer(&event("job", 20), start + Duration::from_millis(150));
        listener.offer(&event("job", 20), start + Duration::from_millis(400));

        let percents: Vec<u8> = forwarded(listener).into_iter().map(|(_, p)| p).collect();
        assert_eq!(percents, vec![0, 20]);
    }

    #[test]
    fn test_job_change_always_passes() {
        let mut listener = ThrottledListener::new(RecordingListener::new(), Duration::from_secs(60));
        let now = Instant::now();

        listener.offer(&event("first", 40), now);
        listener.offer(&event("second", 40), now);
        listener.offer(&event("first", 40), now);

        assert_eq!(forwarded(listener).len(), 3);
    }
}
