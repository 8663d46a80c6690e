use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::keys::{Keys, PartitionKey, SortKey};

use super::types::{from_item, to_item, Item};
use super::{Result, Transaction};

/// Generic access to a table addressed by partition and sort key.
///
/// Implementations confine side effects to the store itself. Reads that
/// expect a single record fail with `NotFound` or `MultipleResults`; reads
/// returning collections return an empty vector instead of failing.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Gets the item stored at `keys`.
    async fn one(&self, keys: &Keys) -> Result<Item>;

    /// Resolves the keys of the lpa owner record indexed under `uid`.
    async fn one_by_uid(&self, uid: &str) -> Result<Keys>;

    /// Gets the only item in `pk` whose sort key starts with `sk_prefix`.
    async fn one_by_partial_sk(&self, pk: &PartitionKey, sk_prefix: &str) -> Result<Item>;

    /// Gets every item in `pk` whose sort key starts with `sk_prefix`.
    async fn all_by_partial_sk(&self, pk: &PartitionKey, sk_prefix: &str) -> Result<Vec<Item>>;

    /// Gets every item with exactly this sort key, across partitions.
    async fn all_by_sk(&self, sk: &SortKey) -> Result<Vec<Item>>;

    /// Lists the keys indexed under `uid` whose sort key starts with `sk_prefix`.
    async fn all_keys_by_lpa_uid(&self, uid: &str, sk_prefix: &str) -> Result<Vec<Keys>>;

    /// Gets an arbitrary item from `pk`.
    async fn any_by_pk(&self, pk: &PartitionKey) -> Result<Item>;

    /// Gets the items stored at `keys`, silently skipping missing ones.
    async fn all_by_keys(&self, keys: &[Keys]) -> Result<Vec<Item>>;

    /// Writes an item unconditionally, or under its `Version` if it has one.
    async fn put(&self, item: Item) -> Result<()>;

    /// Writes an item only if nothing exists at its keys.
    async fn create(&self, item: Item) -> Result<()>;

    /// Deletes every item at `keys` atomically.
    async fn delete_keys(&self, keys: &[Keys]) -> Result<()>;

    /// Atomically deletes the existing item at `from` and writes `item`.
    async fn move_item(&self, from: &Keys, item: Item) -> Result<()>;

    /// Applies a transaction atomically. Any failed precondition is reported
    /// as `ConditionalCheckFailed`.
    async fn write_transaction(&self, transaction: Transaction) -> Result<()>;
}

/// Typed convenience wrappers over [`StorageClient`].
#[async_trait]
pub trait StorageClientExt: StorageClient {
    /// Gets and deserializes the item stored at `keys`.
    async fn one_as<T: DeserializeOwned + Send>(&self, keys: &Keys) -> Result<T> {
        from_item(self.one(keys).await?)
    }

    /// Gets and deserializes the only item matching a sort key prefix.
    async fn one_by_partial_sk_as<T: DeserializeOwned + Send>(
        &self,
        pk: &PartitionKey,
        sk_prefix: &str,
    ) -> Result<T> {
        from_item(self.one_by_partial_sk(pk, sk_prefix).await?)
    }

    /// Serializes and writes a value with [`StorageClient::put`].
    async fn put_value<T: Serialize + Sync + ?Sized>(&self, value: &T) -> Result<()> {
        self.put(to_item(value)?).await
    }

    /// Serializes and writes a value with [`StorageClient::create`].
    async fn create_value<T: Serialize + Sync + ?Sized>(&self, value: &T) -> Result<()> {
        self.create(to_item(value)?).await
    }
}

impl<C: StorageClient + ?Sized> StorageClientExt for C {}
