//! Progress reporting.
//!
//! Producers (partitioners, the execution manager) send [`ProgressEvent`]s
//! through a [`ProgressHandle`]. A single [`ProgressReporter`] thread owns the
//! throttling state and forwards the surviving events to a listener.

mod event;
mod listener;
mod reporter;
mod throttle;
mod tracker;

pub use event::{ProgressEvent, UNKNOWN_REMAINING};
pub use listener::{ConsoleProgressListener, NoopListener, ProgressListener, RecordingListener};
pub use reporter::{ProgressHandle, ProgressReporter};
pub use throttle::ThrottledListener;
pub use tracker::ProgressTracker;
