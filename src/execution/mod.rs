//! Batch execution of independent tasks on a bounded worker pool.

mod executor;
mod manager;
mod task;

pub use executor::{FnExecutor, SingleTaskExecutor};
pub use manager::ParallelExecutionManager;
pub use task::{BatchReport, CompletedTask, TaskId, TaskInput};
