//! In-memory storage backend.
//!
//! Stores every item in a `BTreeMap` behind `Arc<RwLock<_>>`. Used by the
//! test suite and for local runs where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::storage::inmemory::InMemoryClient;
//!
//! let client = InMemoryClient::new();
//! // Use client for testing...
//! ```

mod client;

pub use client::InMemoryClient;
