use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use log::{debug, error, info};

use super::executor::SingleTaskExecutor;
use super::task::{BatchReport, CompletedTask, TaskId, TaskInput};
use crate::config::ExecutionSettings;
use crate::errors::{EngineError, EngineResult};
use crate::progress::{ProgressHandle, ProgressTracker};

/// Runs batches of independent tasks on a bounded pool of worker threads.
///
/// Workers pull from a shared queue and run each task to completion before
/// taking the next one. The calling thread blocks until the batch drains,
/// collecting results and reporting progress after every completion.
///
/// Failures are fail-fast: the first task error stops workers from taking
/// new tasks and is returned once the tasks already running have finished.
/// There is no cancellation or timeout, so a task that never returns stalls
/// the batch.
pub struct ParallelExecutionManager {
    parallelism: usize,
    progress: ProgressHandle,
}

enum TaskOutcome<O> {
    Completed(CompletedTask<O>),
    Failed { id: TaskId, error: EngineError },
    Panicked { id: TaskId, message: String },
}

impl<O> TaskOutcome<O> {
    fn is_failure(&self) -> bool {
        !matches!(self, TaskOutcome::Completed(_))
    }
}

struct TaskQueue<I> {
    pending: Mutex<VecDeque<TaskInput<I>>>,
}

impl<I> TaskQueue<I> {
    fn new(inputs: Vec<I>) -> Self {
        let pending = inputs
            .into_iter()
            .enumerate()
            .map(|(id, payload)| TaskInput { id, payload })
            .collect();

        Self {
            pending: Mutex::new(pending),
        }
    }

    fn pop(&self) -> Option<TaskInput<I>> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn remaining(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ParallelExecutionManager {
    pub fn new(parallelism: usize, progress: ProgressHandle) -> EngineResult<Self> {
        if parallelism == 0 {
            return Err(EngineError::invalid(
                "parallelism",
                "at least one worker thread is required",
            ));
        }

        Ok(Self {
            parallelism,
            progress,
        })
    }

    pub fn from_settings(settings: &ExecutionSettings, progress: ProgressHandle) -> EngineResult<Self> {
        Self::new(settings.resolved_parallelism(), progress)
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn progress(&self) -> &ProgressHandle {
        &self.progress
    }

    pub fn run<E: SingleTaskExecutor>(
        &self,
        job_name: &str,
        inputs: Vec<E::Input>,
        executor: &E,
    ) -> EngineResult<BatchReport<E::Output>> {
        let submitted = inputs.len();
        let worker_count = self.parallelism.min(submitted);
        let started = Instant::now();
        let mut tracker = ProgressTracker::new(job_name, submitted);

        info!("Running '{}': {} tasks on {} workers", job_name, submitted, worker_count);
        self.progress.report(tracker.start_event());

        let queue = TaskQueue::new(inputs);
        let abort = AtomicBool::new(false);
        let (sender, receiver) = mpsc::channel();

        let (collected, worker_died) = thread::scope(|scope| {
            let queue = &queue;
            let abort = &abort;

            let workers: Vec<_> = (0..worker_count)
                .map(|_| {
                    let sender = sender.clone();
                    scope.spawn(move || run_worker(queue, executor, abort, sender))
                })
                .collect();
            drop(sender);

            let collected = self.collect_outcomes(job_name, receiver, &mut tracker, abort);
            let worker_died = workers
                .into_iter()
                .map(|worker| worker.join().is_err())
                .fold(false, |died, failed| died || failed);

            (collected, worker_died)
        });

        if worker_died {
            error!("A worker of '{}' terminated unexpectedly", job_name);
            return Err(EngineError::WorkerPanicked(job_name.to_string()));
        }

        let completed = collected.inspect_err(|_| {
            info!("'{}' aborted with {} tasks never started", job_name, queue.remaining());
        })?;

        if submitted == 0 {
            self.progress.report(tracker.finish_event());
        }

        debug!("'{}' finished in {:?}", job_name, started.elapsed());
        Ok(BatchReport::new(job_name, submitted, completed, started.elapsed()))
    }

    fn collect_outcomes<O>(
        &self,
        job_name: &str,
        receiver: Receiver<TaskOutcome<O>>,
        tracker: &mut ProgressTracker,
        abort: &AtomicBool,
    ) -> EngineResult<Vec<CompletedTask<O>>> {
        let mut completed = Vec::with_capacity(tracker.total());
        let mut failure = None;

        for outcome in receiver {
            match outcome {
                TaskOutcome::Completed(task) => {
                    completed.push(task);
                    self.progress.report(tracker.record_completion());
                }
                TaskOutcome::Failed { id, error } => {
                    abort.store(true, Ordering::Release);
                    record_failure(&mut failure, task_failed(job_name, id, error));
                }
                TaskOutcome::Panicked { id, message } => {
                    abort.store(true, Ordering::Release);
                    let error = EngineError::TaskPanicked {
                        job: job_name.to_string(),
                        task_id: id,
                        message,
                    };
                    record_failure(&mut failure, error);
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(completed),
        }
    }
}

fn task_failed(job_name: &str, id: TaskId, error: EngineError) -> EngineError {
    EngineError::TaskFailed {
        job: job_name.to_string(),
        task_id: id,
        source: Box::new(error),
    }
}

fn record_failure(failure: &mut Option<EngineError>, error: EngineError) {
    if failure.is_some() {
        debug!("Ignoring later failure: {}", error);
        return;
    }
    error!("{}", error);
    *failure = Some(error);
}

fn run_worker<E: SingleTaskExecutor>(
    queue: &TaskQueue<E::Input>,
    executor: &E,
    abort: &AtomicBool,
    sender: Sender<TaskOutcome<E::Output>>,
) {
    while !abort.load(Ordering::Acquire) {
        let Some(task) = queue.pop() else {
            break;
        };

        let outcome = execute_task(executor, task);
        if outcome.is_failure() {
            abort.store(true, Ordering::Release);
        }
        if sender.send(outcome).is_err() {
            break;
        }
    }
}

fn execute_task<E: SingleTaskExecutor>(
    executor: &E,
    task: TaskInput<E::Input>,
) -> TaskOutcome<E::Output> {
    let TaskInput { id, payload } = task;

    match panic::catch_unwind(AssertUnwindSafe(|| executor.execute(payload))) {
        Ok(Ok(output)) => TaskOutcome::Completed(CompletedTask { id, output }),
        Ok(Err(error)) => TaskOutcome::Failed { id, error },
        Err(panic) => TaskOutcome::Panicked {
            id,
            message: panic_message(panic.as_ref()),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return message.to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_string()
}
