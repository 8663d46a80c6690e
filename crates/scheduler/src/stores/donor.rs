use std::sync::Arc;

use async_trait::async_trait;

use lpa_core::domain::DonorProvided;
use lpa_core::keys::{Keys, LpaKey, LpaOwnerKey};
use lpa_core::ports::{Clock, DonorStore};
use lpa_core::storage::{Result, StorageClient, StorageClientExt};

/// Reads and writes the donor aggregate.
pub struct StorageDonorStore {
    client: Arc<dyn StorageClient>,
    clock: Arc<dyn Clock>,
}

impl StorageDonorStore {
    pub fn new(client: Arc<dyn StorageClient>, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }
}

#[async_trait]
impl DonorStore for StorageDonorStore {
    async fn one(&self, lpa_key: &LpaKey, owner_key: &LpaOwnerKey) -> Result<DonorProvided> {
        let keys = Keys::new(lpa_key.clone(), owner_key.sort_key().clone());
        self.client.one_as(&keys).await
    }

    async fn put(&self, donor: &DonorProvided) -> Result<()> {
        let mut donor = donor.clone();
        donor.updated_at = self.clock.now();

        self.client.put_value(&donor).await
    }
}
