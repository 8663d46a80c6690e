//! The scheduled event queue and the runner that drains it.

pub mod error;
pub mod runner;
pub mod steps;
pub mod store;
pub mod waiter;

#[cfg(test)]
mod testing;

pub use error::{RunnerError, StepContext, StepError};
pub use runner::{ActionHandler, EventQueue, Runner};
pub use steps::{action_handlers, StepDeps};
pub use store::ScheduleStore;
pub use waiter::{BackoffWaiter, Waiter, WaiterError};
