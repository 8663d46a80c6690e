//! In-memory storage client.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use lpa_core::keys::{Keys, LpaOwnerKey, PartitionKey, SortKey};
use lpa_core::storage::{
    bump_version, item_keys, item_lpa_uid, item_version, Item, Result, StorageClient, StoreError,
    Transaction,
};

type Table = BTreeMap<(String, String), Item>;

fn table_key(keys: &Keys) -> (String, String) {
    (keys.pk.to_string(), keys.sk.to_string())
}

fn item_table_key(item: &Item) -> Result<(String, String)> {
    item_keys(item).map(|keys| table_key(&keys))
}

/// In-memory storage backend for testing and local runs.
///
/// Items live in a `BTreeMap` keyed by the encoded (PK, SK) pair wrapped in
/// `Arc<RwLock<_>>`. Every write takes the write lock for its whole duration,
/// which is what makes transactions and moves atomic. Data is not persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClient {
    items: Arc<RwLock<Table>>,
}

impl InMemoryClient {
    /// Creates a new empty client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn partition<'a>(
        table: &'a Table,
        pk: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Item)> {
        table
            .range((pk.to_string(), String::new())..)
            .take_while(move |((item_pk, _), _)| item_pk == pk)
            .map(|((_, sk), item)| (sk, item))
    }

    fn apply(table: &mut Table, transaction: Transaction) -> Result<()> {
        transaction.validate()?;

        let mut creates = Vec::with_capacity(transaction.creates().len());
        for item in transaction.creates() {
            let key = item_table_key(item)?;
            if table.contains_key(&key) {
                return Err(StoreError::ConditionalCheckFailed);
            }
            creates.push((key, item.clone()));
        }

        let mut puts = Vec::with_capacity(transaction.puts().len());
        for item in transaction.puts() {
            puts.push((item_table_key(item)?, item.clone()));
        }

        for keys in transaction.deletes() {
            table.remove(&table_key(keys));
        }
        table.extend(puts);
        table.extend(creates);

        Ok(())
    }
}

#[async_trait]
impl StorageClient for InMemoryClient {
    async fn one(&self, keys: &Keys) -> Result<Item> {
        let items = self.items.read().await;
        items
            .get(&table_key(keys))
            .cloned()
            .ok_or_else(|| StoreError::not_found("item", keys.to_string()))
    }

    async fn one_by_uid(&self, uid: &str) -> Result<Keys> {
        let items = self.items.read().await;
        let mut found = Vec::new();

        for item in items.values().filter(|item| item_lpa_uid(item) == Some(uid)) {
            let keys = item_keys(item)?;
            if matches!(keys.pk, PartitionKey::Lpa(_))
                && LpaOwnerKey::try_from(keys.sk.clone()).is_ok()
            {
                found.push(keys);
            }
        }

        match found.len() {
            0 => Err(StoreError::not_found("lpa owner", uid)),
            1 => Ok(found.remove(0)),
            count => Err(StoreError::MultipleResults {
                entity_type: "lpa owner",
                id: uid.to_string(),
                count,
            }),
        }
    }

    async fn one_by_partial_sk(&self, pk: &PartitionKey, sk_prefix: &str) -> Result<Item> {
        let mut matches = self.all_by_partial_sk(pk, sk_prefix).await?;
        match matches.len() {
            0 => Err(StoreError::not_found("item", format!("{pk}/{sk_prefix}"))),
            1 => Ok(matches.remove(0)),
            count => Err(StoreError::MultipleResults {
                entity_type: "item",
                id: format!("{pk}/{sk_prefix}"),
                count,
            }),
        }
    }

    async fn all_by_partial_sk(&self, pk: &PartitionKey, sk_prefix: &str) -> Result<Vec<Item>> {
        let items = self.items.read().await;
        let pk = pk.to_string();
        let found: Vec<Item> = Self::partition(&items, &pk)
            .filter(|(sk, _)| sk.starts_with(sk_prefix))
            .map(|(_, item)| item.clone())
            .collect();
        Ok(found)
    }

    async fn all_by_sk(&self, sk: &SortKey) -> Result<Vec<Item>> {
        let items = self.items.read().await;
        let sk = sk.to_string();
        Ok(items
            .iter()
            .filter(|((_, item_sk), _)| *item_sk == sk)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn all_keys_by_lpa_uid(&self, uid: &str, sk_prefix: &str) -> Result<Vec<Keys>> {
        let items = self.items.read().await;
        items
            .iter()
            .filter(|((_, sk), item)| item_lpa_uid(item) == Some(uid) && sk.starts_with(sk_prefix))
            .map(|(_, item)| item_keys(item))
            .collect()
    }

    async fn any_by_pk(&self, pk: &PartitionKey) -> Result<Item> {
        let items = self.items.read().await;
        let pk_s = pk.to_string();
        let found = Self::partition(&items, &pk_s)
            .map(|(_, item)| item.clone())
            .next();
        found.ok_or_else(|| StoreError::not_found("item", pk_s))
    }

    async fn all_by_keys(&self, keys: &[Keys]) -> Result<Vec<Item>> {
        let items = self.items.read().await;
        Ok(keys
            .iter()
            .filter_map(|keys| items.get(&table_key(keys)).cloned())
            .collect())
    }

    async fn put(&self, mut item: Item) -> Result<()> {
        let key = item_table_key(&item)?;
        let expected = bump_version(&mut item)?;

        let mut items = self.items.write().await;
        if let Some(expected) = expected {
            let stored = match items.get(&key) {
                Some(stored) => item_version(stored)?,
                None => None,
            };
            if stored != Some(expected) {
                return Err(StoreError::ConditionalCheckFailed);
            }
        }

        items.insert(key, item);
        Ok(())
    }

    async fn create(&self, item: Item) -> Result<()> {
        let key = item_table_key(&item)?;

        let mut items = self.items.write().await;
        if items.contains_key(&key) {
            return Err(StoreError::ConditionalCheckFailed);
        }

        items.insert(key, item);
        Ok(())
    }

    async fn delete_keys(&self, keys: &[Keys]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let transaction = keys
            .iter()
            .cloned()
            .fold(Transaction::new(), Transaction::delete);

        let mut items = self.items.write().await;
        Self::apply(&mut items, transaction)
    }

    async fn move_item(&self, from: &Keys, item: Item) -> Result<()> {
        let to = item_table_key(&item)?;
        let from = table_key(from);

        let mut items = self.items.write().await;
        if items.remove(&from).is_none() {
            return Err(StoreError::ConditionalCheckFailed);
        }

        items.insert(to, item);
        Ok(())
    }

    async fn write_transaction(&self, transaction: Transaction) -> Result<()> {
        let mut items = self.items.write().await;
        Self::apply(&mut items, transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpa_core::keys::{AttorneyKey, DonorKey, LpaKey};
    use lpa_core::storage::{to_item, StorageClientExt};
    use serde_json::json;

    fn item(pk: &str, sk: &str) -> Item {
        to_item(&json!({"PK": pk, "SK": sk, "Data": "x"})).unwrap()
    }

    fn keys(lpa: &str, donor: &str) -> Keys {
        Keys::new(LpaKey::new(lpa), DonorKey::new(donor))
    }

    // ==================== Point Reads ====================

    #[tokio::test]
    async fn test_one_missing_is_not_found() {
        let client = InMemoryClient::new();
        let err = client.one(&keys("a", "b")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_put_then_one() {
        let client = InMemoryClient::new();
        client.put(item("LPA#a", "DONOR#b")).await.unwrap();

        let stored = client.one(&keys("a", "b")).await.unwrap();
        assert_eq!(stored.get("Data"), Some(&json!("x")));
    }

    #[tokio::test]
    async fn test_put_rejects_malformed_keys() {
        let client = InMemoryClient::new();
        let err = client.put(item("LPA#a", "WHAT#b")).await.unwrap_err();
        assert!(matches!(err, StoreError::MalformedKey(_)));
    }

    // ==================== Create vs Put ====================

    #[tokio::test]
    async fn test_create_twice_conflicts() {
        let client = InMemoryClient::new();
        client.create(item("LPA#a", "DONOR#b")).await.unwrap();

        let err = client.create(item("LPA#a", "DONOR#b")).await.unwrap_err();
        assert_eq!(err, StoreError::ConditionalCheckFailed);
    }

    #[tokio::test]
    async fn test_put_twice_never_conflicts() {
        let client = InMemoryClient::new();
        client.put(item("LPA#a", "DONOR#b")).await.unwrap();
        client.put(item("LPA#a", "DONOR#b")).await.unwrap();
        assert_eq!(client.len().await, 1);
    }

    #[tokio::test]
    async fn test_versioned_put_is_optimistically_locked() {
        let client = InMemoryClient::new();
        let mut versioned = item("LPA#a", "DONOR#b");
        versioned.insert("Version".to_string(), json!(0));
        client.create(versioned.clone()).await.unwrap();

        client.put(versioned.clone()).await.unwrap();
        let stored = client.one(&keys("a", "b")).await.unwrap();
        assert_eq!(stored.get("Version"), Some(&json!(1)));

        // Still at version 0, so stale.
        let err = client.put(versioned).await.unwrap_err();
        assert_eq!(err, StoreError::ConditionalCheckFailed);
    }

    #[tokio::test]
    async fn test_versioned_put_of_missing_item_conflicts() {
        let client = InMemoryClient::new();
        let mut versioned = item("LPA#a", "DONOR#b");
        versioned.insert("Version".to_string(), json!(0));

        let err = client.put(versioned).await.unwrap_err();
        assert_eq!(err, StoreError::ConditionalCheckFailed);
    }

    // ==================== Queries ====================

    #[tokio::test]
    async fn test_one_by_partial_sk_requires_exactly_one() {
        let client = InMemoryClient::new();
        let pk = PartitionKey::from(LpaKey::new("a"));

        let err = client.one_by_partial_sk(&pk, "ATTORNEY#").await.unwrap_err();
        assert!(err.is_not_found());

        client.put(item("LPA#a", "ATTORNEY#1")).await.unwrap();
        assert!(client.one_by_partial_sk(&pk, "ATTORNEY#").await.is_ok());

        client.put(item("LPA#a", "ATTORNEY#2")).await.unwrap();
        let err = client.one_by_partial_sk(&pk, "ATTORNEY#").await.unwrap_err();
        assert!(matches!(err, StoreError::MultipleResults { count: 2, .. }));
    }

    #[tokio::test]
    async fn test_all_by_partial_sk_stays_in_partition() {
        let client = InMemoryClient::new();
        client.put(item("LPA#a", "ATTORNEY#1")).await.unwrap();
        client.put(item("LPA#a", "DONOR#1")).await.unwrap();
        client.put(item("LPA#ab", "ATTORNEY#2")).await.unwrap();

        let pk = PartitionKey::from(LpaKey::new("a"));
        let found = client.all_by_partial_sk(&pk, "ATTORNEY#").await.unwrap();
        assert_eq!(found.len(), 1);

        let none = client.all_by_partial_sk(&pk, "DOCUMENT#").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_all_by_sk_spans_partitions() {
        let client = InMemoryClient::new();
        client.put(item("LPA#a", "ATTORNEY#1")).await.unwrap();
        client.put(item("LPA#b", "ATTORNEY#1")).await.unwrap();
        client.put(item("LPA#b", "ATTORNEY#2")).await.unwrap();

        let sk = SortKey::from(AttorneyKey::new("1"));
        assert_eq!(client.all_by_sk(&sk).await.unwrap().len(), 2);
        let sk = SortKey::from(AttorneyKey::new("3"));
        assert!(client.all_by_sk(&sk).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lpa_uid_lookups() {
        let client = InMemoryClient::new();
        for (pk, sk) in [("LPA#a", "DONOR#d"), ("LPA#a", "ATTORNEY#1")] {
            let mut with_uid = item(pk, sk);
            with_uid.insert("LpaUID".to_string(), json!("M-1"));
            client.put(with_uid).await.unwrap();
        }

        let owner = client.one_by_uid("M-1").await.unwrap();
        assert_eq!(owner, keys("a", "d"));

        let attorneys = client.all_keys_by_lpa_uid("M-1", "ATTORNEY#").await.unwrap();
        assert_eq!(attorneys.len(), 1);

        assert!(client.one_by_uid("M-2").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_any_by_pk() {
        let client = InMemoryClient::new();
        let pk = PartitionKey::from(LpaKey::new("a"));
        assert!(client.any_by_pk(&pk).await.unwrap_err().is_not_found());

        client.put(item("LPA#a", "DONOR#1")).await.unwrap();
        assert!(client.any_by_pk(&pk).await.is_ok());
    }

    #[tokio::test]
    async fn test_any_by_pk_ignores_neighbouring_partitions() {
        let client = InMemoryClient::new();
        client.put(item("LPA#ab", "DONOR#1")).await.unwrap();
        client.put(item("LPA#", "DONOR#2")).await.unwrap();

        let pk = PartitionKey::from(LpaKey::new("a"));
        assert!(client.any_by_pk(&pk).await.unwrap_err().is_not_found());
        assert!(client.all_by_partial_sk(&pk, "").await.unwrap().is_empty());

        client.put(item("LPA#a", "DONOR#3")).await.unwrap();
        let found = client.any_by_pk(&pk).await.unwrap();
        assert_eq!(found.get("SK"), Some(&json!("DONOR#3")));
    }

    #[tokio::test]
    async fn test_all_by_keys_skips_missing() {
        let client = InMemoryClient::new();
        client.put(item("LPA#a", "DONOR#1")).await.unwrap();

        let found = client
            .all_by_keys(&[keys("a", "1"), keys("a", "2")])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    // ==================== Transactions ====================

    #[tokio::test]
    async fn test_transaction_with_colliding_create_writes_nothing() {
        let client = InMemoryClient::new();
        client.put(item("LPA#a", "DONOR#1")).await.unwrap();

        let transaction = Transaction::new()
            .put(&item("LPA#b", "DONOR#1"))
            .unwrap()
            .create(&item("LPA#c", "DONOR#1"))
            .unwrap()
            .create(&item("LPA#a", "DONOR#1"))
            .unwrap()
            .delete(keys("a", "1"));

        let err = client.write_transaction(transaction).await.unwrap_err();
        assert_eq!(err, StoreError::ConditionalCheckFailed);
        assert_eq!(client.len().await, 1);
        assert!(client.one(&keys("a", "1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_transaction_applies_all_operations() {
        let client = InMemoryClient::new();
        client.put(item("LPA#a", "DONOR#1")).await.unwrap();

        let transaction = Transaction::new()
            .create(&item("LPA#b", "DONOR#1"))
            .unwrap()
            .delete(keys("a", "1"));
        client.write_transaction(transaction).await.unwrap();

        assert!(client.one(&keys("a", "1")).await.unwrap_err().is_not_found());
        assert!(client.one(&keys("b", "1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_transaction_is_rejected() {
        let client = InMemoryClient::new();
        let err = client.write_transaction(Transaction::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_move_requires_source() {
        let client = InMemoryClient::new();
        client.put(item("LPA#a", "DONOR#1")).await.unwrap();

        client
            .move_item(&keys("a", "1"), item("LPA#b", "DONOR#1"))
            .await
            .unwrap();
        assert!(client.one(&keys("b", "1")).await.is_ok());

        let err = client
            .move_item(&keys("a", "1"), item("LPA#c", "DONOR#1"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::ConditionalCheckFailed);
        assert!(client.one(&keys("c", "1")).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_keys() {
        let client = InMemoryClient::new();
        client.put(item("LPA#a", "DONOR#1")).await.unwrap();
        client.put(item("LPA#a", "DONOR#2")).await.unwrap();

        client.delete_keys(&[]).await.unwrap();
        client
            .delete_keys(&[keys("a", "1"), keys("a", "2")])
            .await
            .unwrap();
        assert!(client.is_empty().await);
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let client = InMemoryClient::new();
        client
            .create_value(&json!({"PK": "LPA#a", "SK": "DONOR#1", "Data": "y"}))
            .await
            .unwrap();

        let value: serde_json::Value = client.one_as(&keys("a", "1")).await.unwrap();
        assert_eq!(value["Data"], json!("y"));
    }
}
