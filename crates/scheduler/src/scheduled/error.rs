use std::error::Error as StdError;

use thiserror::Error;

use lpa_core::ports::ClientError;

use super::waiter::WaiterError;

/// Outcome of an action that did not complete.
#[derive(Debug, Error)]
pub enum StepError {
    /// The action's preconditions do not hold, so there is nothing to do.
    #[error("step ignored")]
    Ignored,
    #[error("{context}: {source}")]
    Failed {
        context: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl StepError {
    pub fn is_ignored(&self) -> bool {
        matches!(self, StepError::Ignored)
    }
}

/// Attaches a short description of the failing step to an error.
pub trait StepContext<T> {
    fn context(self, context: &'static str) -> Result<T, StepError>;
}

impl<T, E> StepContext<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context(self, context: &'static str) -> Result<T, StepError> {
        self.map_err(|source| StepError::Failed {
            context,
            source: Box::new(source),
        })
    }
}

/// Why a drain stopped early.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("could not get scheduled events: {0}")]
    Waiter(#[from] WaiterError),
    #[error("could not put metrics: {0}")]
    Metrics(#[from] ClientError),
}
