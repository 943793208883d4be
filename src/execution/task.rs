use std::time::Duration;

/// Submission index of a task within its batch
pub type TaskId = usize;

/// Input record of one unit of work, consumed by the executor
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInput<I> {
    pub id: TaskId,
    pub payload: I,
}

/// Output record of one finished unit of work
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedTask<O> {
    pub id: TaskId,
    pub output: O,
}

/// Completed tasks of one batch, in completion order
#[derive(Debug)]
pub struct BatchReport<O> {
    job_name: String,
    submitted: usize,
    completed: Vec<CompletedTask<O>>,
    elapsed: Duration,
}

impl<O> BatchReport<O> {
    pub fn new(
        job_name: impl Into<String>,
        submitted: usize,
        completed: Vec<CompletedTask<O>>,
        elapsed: Duration,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            submitted,
            completed,
            elapsed,
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn completed(&self) -> &[CompletedTask<O>] {
        &self.completed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_complete(&self) -> bool {
        self.completed.len() == self.submitted
    }

    /// Restores submission order
    pub fn sort_by_index(&mut self) {
        self.completed.sort_by_key(|task| task.id);
    }

    pub fn into_completed(self) -> Vec<CompletedTask<O>> {
        self.completed
    }

    pub fn into_sorted_outputs(mut self) -> Vec<O> {
        self.sort_by_index();
        self.completed.into_iter().map(|task| task.output).collect()
    }
}
