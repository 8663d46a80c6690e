//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of `StorageClient`
//! using `aws-sdk-dynamodb`.

mod client;
mod conversions;
mod error;

pub use client::DynamoDbClient;
