use std::sync::Arc;

use async_trait::async_trait;

use lpa_core::domain::AttorneyProvided;
use lpa_core::keys::{AttorneyKey, SortKey};
use lpa_core::ports::AttorneyStore;
use lpa_core::storage::{from_item, Result, StorageClient};

/// Reads the attorney aggregates of an lpa through the uid index.
pub struct StorageAttorneyStore {
    client: Arc<dyn StorageClient>,
}

impl StorageAttorneyStore {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttorneyStore for StorageAttorneyStore {
    async fn all(&self, lpa_uid: &str) -> Result<Vec<AttorneyProvided>> {
        let prefix = SortKey::from(AttorneyKey::new("")).to_string();
        let keys = self.client.all_keys_by_lpa_uid(lpa_uid, &prefix).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        self.client
            .all_by_keys(&keys)
            .await?
            .into_iter()
            .map(from_item)
            .collect()
    }
}
