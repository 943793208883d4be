use std::marker::PhantomData;

use crate::errors::EngineResult;

/// Executes one kind of task.
///
/// Shared by reference across all workers of a batch. Conditions with a
/// meaningful neutral result (no common items, unknown user) must be returned
/// as a normal output; an `Err` aborts the whole batch.
pub trait SingleTaskExecutor: Sync {
    type Input: Send;
    type Output: Send;

    fn execute(&self, input: Self::Input) -> EngineResult<Self::Output>;
}

/// Adapts a closure into an executor
pub struct FnExecutor<F, I, O> {
    function: F,
    _types: PhantomData<fn(I) -> O>,
}

impl<F, I, O> FnExecutor<F, I, O>
where
    F: Fn(I) -> EngineResult<O> + Sync,
{
    pub fn new(function: F) -> Self {
        Self {
            function,
            _types: PhantomData,
        }
    }
}

impl<F, I, O> SingleTaskExecutor for FnExecutor<F, I, O>
where
    F: Fn(I) -> EngineResult<O> + Sync,
    I: Send,
    O: Send,
{
    type Input = I;
    type Output = O;

    fn execute(&self, input: I) -> EngineResult<O> {
        (self.function)(input)
    }
}
