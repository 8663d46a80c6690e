//! Scheduled event types shared by the queue and its producers.

mod action;
mod event;

pub use action::Action;
pub use event::Event;
