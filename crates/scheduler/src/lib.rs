//! Runs scheduled lasting power of attorney actions.
//!
//! Events are queued in day buckets by [`scheduled::ScheduleStore`] and
//! drained by [`scheduled::Runner`], which dispatches each one to the action
//! it names. Actions read the aggregates behind [`stores`] and reach people
//! through the collaborator [`clients`].

pub mod clients;
pub mod config;
pub mod scheduled;
pub mod storage;
pub mod stores;
