use std::io;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use super::event::ProgressEvent;
use super::listener::ProgressListener;
use super::throttle::ThrottledListener;
use crate::config::ProgressSettings;

enum ReporterMessage {
    Event(ProgressEvent),
    Stop,
}

/// Cloneable sending side of the progress channel
#[derive(Clone, Default)]
pub struct ProgressHandle {
    sender: Option<SyncSender<ReporterMessage>>,
}

impl ProgressHandle {
    /// Handle that drops every event
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Sends an event to the reporter thread.
    ///
    /// Start and finish marks wait for room in the queue; intermediate
    /// events are dropped when the queue is full.
    pub fn report(&self, event: ProgressEvent) {
        let Some(sender) = &self.sender else {
            return;
        };

        if event.is_start() || event.is_finished() {
            if sender.send(ReporterMessage::Event(event)).is_err() {
                debug!("Progress reporter already stopped");
            }
            return;
        }

        match sender.try_send(ReporterMessage::Event(event)) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => debug!("Progress reporter already stopped"),
        }
    }
}

/// Owns the thread that drains progress events into a throttled listener
pub struct ProgressReporter<L> {
    handle: ProgressHandle,
    worker: JoinHandle<ThrottledListener<L>>,
}

impl<L: ProgressListener + 'static> ProgressReporter<L> {
    pub fn spawn(listener: L, settings: &ProgressSettings) -> io::Result<Self> {
        let capacity = settings.channel_capacity.max(1);
        let (sender, receiver) = mpsc::sync_channel(capacity);
        let throttled = ThrottledListener::new(listener, Duration::from_millis(settings.min_interval_ms));

        let worker = thread::Builder::new()
            .name("progress-reporter".to_string())
            .spawn(move || drain_events(receiver, throttled))?;

        Ok(Self {
            handle: ProgressHandle {
                sender: Some(sender),
            },
            worker,
        })
    }

    pub fn handle(&self) -> ProgressHandle {
        self.handle.clone()
    }

    /// Stops the reporter after all queued events and returns the listener
    pub fn finish(self) -> Option<L> {
        if let Some(sender) = &self.handle.sender {
            let _ = sender.send(ReporterMessage::Stop);
        }

        match self.worker.join() {
            Ok(throttled) => Some(throttled.into_inner()),
            Err(_) => {
                warn!("Progress reporter thread panicked");
                None
            }
        }
    }
}

fn drain_events<L: ProgressListener>(
    receiver: Receiver<ReporterMessage>,
    mut listener: ThrottledListener<L>,
) -> ThrottledListener<L> {
    for message in receiver {
        match message {
            ReporterMessage::Event(event) => listener.on_progress(&event),
            ReporterMessage::Stop => break,
        }
    }
    listener
}
