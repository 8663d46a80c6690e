//! Core building blocks shared by the scheduler and its tooling.
//!
//! Everything in this crate is free of network I/O: key encoding, the storage
//! contract, scheduled event types, aggregate data and the collaborator ports
//! that concrete services implement.

pub mod domain;
pub mod keys;
pub mod ports;
pub mod scheduled;
pub mod storage;
