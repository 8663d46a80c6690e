//! DynamoDB storage client.
//!
//! Implements `StorageClient` from `lpa_core::storage` against a single
//! table keyed by `PK`/`SK`, with two global secondary indexes:
//! `LpaUIDIndex` (partition `LpaUID`) and `SKUpdatedAtIndex` (partition
//! `SK`, sort `UpdatedAt`).

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeValue, Delete, KeysAndAttributes, Put, TransactWriteItem,
};
use aws_sdk_dynamodb::Client;

use lpa_core::keys::{Keys, LpaKey, LpaOwnerKey, PartitionKey, SortKey};
use lpa_core::storage::{
    bump_version, item_keys, Item, Result, StorageClient, StoreError, Transaction,
};

use super::conversions::{
    attributes_to_item, attributes_to_keys, item_to_attributes, keys_to_attributes, AttributeMap,
};
use super::error::{
    map_batch_get_error, map_build_error, map_connection_error, map_get_item_error,
    map_put_item_error, map_query_error, map_transact_write_error,
};

const LPA_UID_INDEX: &str = "LpaUIDIndex";
const SK_UPDATED_AT_INDEX: &str = "SKUpdatedAtIndex";
const BATCH_GET_LIMIT: usize = 100;

/// DynamoDB-based storage client.
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
}

impl DynamoDbClient {
    /// Creates a new storage client with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a new storage client from the AWS environment and checks the
    /// table is reachable.
    ///
    /// Uses the AWS SDK default credential chain, which also honours
    /// `AWS_ENDPOINT_URL` for local DynamoDB.
    pub async fn connect(table_name: impl Into<String>) -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let storage = Self::new(Client::new(&config), table_name);

        storage
            .client
            .describe_table()
            .table_name(storage.table_name())
            .send()
            .await
            .map_err(map_connection_error)?;

        Ok(storage)
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn put_request(&self, item: &Item, condition: Option<&str>) -> Result<Put> {
        Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(item)))
            .set_condition_expression(condition.map(str::to_string))
            .build()
            .map_err(map_build_error)
    }

    fn delete_request(&self, keys: &Keys, condition: Option<&str>) -> Result<Delete> {
        Delete::builder()
            .table_name(&self.table_name)
            .set_key(Some(keys_to_attributes(keys)))
            .set_condition_expression(condition.map(str::to_string))
            .build()
            .map_err(map_build_error)
    }

    async fn transact(&self, items: Vec<TransactWriteItem>) -> Result<()> {
        self.client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await
            .map_err(map_transact_write_error)?;

        Ok(())
    }

    async fn query_partition(&self, pk: &PartitionKey, sk_prefix: &str) -> Result<Vec<AttributeMap>> {
        self.client
            .query()
            .table_name(&self.table_name)
            .consistent_read(true)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk)")
            .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
            .expression_attribute_values(":sk", AttributeValue::S(sk_prefix.to_string()))
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(map_query_error)
    }

    async fn query_lpa_uid(
        &self,
        uid: &str,
        filter: &str,
        values: &[(&str, String)],
    ) -> Result<Vec<AttributeMap>> {
        let mut request = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(LPA_UID_INDEX)
            .key_condition_expression("LpaUID = :uid")
            .filter_expression(filter)
            .expression_attribute_values(":uid", AttributeValue::S(uid.to_string()));

        for (name, value) in values {
            request = request.expression_attribute_values(*name, AttributeValue::S(value.clone()));
        }

        request
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(map_query_error)
    }
}

#[async_trait]
impl StorageClient for DynamoDbClient {
    async fn one(&self, keys: &Keys) -> Result<Item> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .consistent_read(true)
            .set_key(Some(keys_to_attributes(keys)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => attributes_to_item(&item),
            None => Err(StoreError::not_found("item", keys.to_string())),
        }
    }

    async fn one_by_uid(&self, uid: &str) -> Result<Keys> {
        let lpa_prefix = PartitionKey::from(LpaKey::new("")).to_string();
        let items = self
            .query_lpa_uid(uid, "begins_with(PK, :pk)", &[(":pk", lpa_prefix)])
            .await?;

        let mut found = Vec::new();
        for item in &items {
            let keys = attributes_to_keys(item)?;
            if LpaOwnerKey::try_from(keys.sk.clone()).is_ok() {
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
        let mut items = self.query_partition(pk, sk_prefix).await?;

        match items.len() {
            0 => Err(StoreError::not_found("item", format!("{pk}/{sk_prefix}"))),
            1 => attributes_to_item(&items.remove(0)),
            count => Err(StoreError::MultipleResults {
                entity_type: "item",
                id: format!("{pk}/{sk_prefix}"),
                count,
            }),
        }
    }

    async fn all_by_partial_sk(&self, pk: &PartitionKey, sk_prefix: &str) -> Result<Vec<Item>> {
        let items = self.query_partition(pk, sk_prefix).await?;
        items.iter().map(attributes_to_item).collect()
    }

    async fn all_by_sk(&self, sk: &SortKey) -> Result<Vec<Item>> {
        let items: Vec<AttributeMap> = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(SK_UPDATED_AT_INDEX)
            .key_condition_expression("SK = :sk")
            .expression_attribute_values(":sk", AttributeValue::S(sk.to_string()))
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(map_query_error)?;

        items.iter().map(attributes_to_item).collect()
    }

    async fn all_keys_by_lpa_uid(&self, uid: &str, sk_prefix: &str) -> Result<Vec<Keys>> {
        let items = self
            .query_lpa_uid(uid, "begins_with(SK, :sk)", &[(":sk", sk_prefix.to_string())])
            .await?;

        items.iter().map(attributes_to_keys).collect()
    }

    async fn any_by_pk(&self, pk: &PartitionKey) -> Result<Item> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .consistent_read(true)
            .key_condition_expression("PK = :pk")
            .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
            .limit(1)
            .send()
            .await
            .map_err(map_query_error)?;

        match result.items.unwrap_or_default().first() {
            Some(item) => attributes_to_item(item),
            None => Err(StoreError::not_found("item", pk.to_string())),
        }
    }

    async fn all_by_keys(&self, keys: &[Keys]) -> Result<Vec<Item>> {
        let mut items = Vec::with_capacity(keys.len());

        for chunk in keys.chunks(BATCH_GET_LIMIT) {
            let mut pending = Some(
                KeysAndAttributes::builder()
                    .set_keys(Some(chunk.iter().map(keys_to_attributes).collect()))
                    .consistent_read(true)
                    .build()
                    .map_err(map_build_error)?,
            );

            while let Some(request) = pending.take() {
                let result = self
                    .client
                    .batch_get_item()
                    .request_items(&self.table_name, request)
                    .send()
                    .await
                    .map_err(map_batch_get_error)?;

                if let Some(mut responses) = result.responses {
                    for item in responses.remove(&self.table_name).unwrap_or_default() {
                        items.push(attributes_to_item(&item)?);
                    }
                }

                pending = result
                    .unprocessed_keys
                    .and_then(|mut unprocessed| unprocessed.remove(&self.table_name))
                    .filter(|request| !request.keys().is_empty());
            }
        }

        Ok(items)
    }

    async fn put(&self, mut item: Item) -> Result<()> {
        item_keys(&item)?;
        let expected = bump_version(&mut item)?;

        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(&item)));

        if let Some(version) = expected {
            request = request
                .condition_expression("Version = :version")
                .expression_attribute_values(":version", AttributeValue::N(version.to_string()));
        }

        request.send().await.map_err(map_put_item_error)?;

        Ok(())
    }

    async fn create(&self, item: Item) -> Result<()> {
        item_keys(&item)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(&item)))
            .condition_expression("attribute_not_exists(PK) AND attribute_not_exists(SK)")
            .send()
            .await
            .map_err(map_put_item_error)?;

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

        self.write_transaction(transaction).await
    }

    async fn move_item(&self, from: &Keys, item: Item) -> Result<()> {
        item_keys(&item)?;

        let delete = self.delete_request(
            from,
            Some("attribute_exists(PK) AND attribute_exists(SK)"),
        )?;
        let put = self.put_request(&item, None)?;

        self.transact(vec![
            TransactWriteItem::builder().delete(delete).build(),
            TransactWriteItem::builder().put(put).build(),
        ])
        .await
    }

    async fn write_transaction(&self, transaction: Transaction) -> Result<()> {
        transaction.validate()?;

        let mut items = Vec::with_capacity(transaction.len());
        for item in transaction.creates() {
            let put = self.put_request(
                item,
                Some("attribute_not_exists(PK) AND attribute_not_exists(SK)"),
            )?;
            items.push(TransactWriteItem::builder().put(put).build());
        }
        for item in transaction.puts() {
            let put = self.put_request(item, None)?;
            items.push(TransactWriteItem::builder().put(put).build());
        }
        for keys in transaction.deletes() {
            let delete = self.delete_request(keys, None)?;
            items.push(TransactWriteItem::builder().delete(delete).build());
        }

        self.transact(items).await
    }
}
