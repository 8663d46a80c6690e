use std::sync::Arc;

use async_trait::async_trait;

use lpa_core::domain::CertificateProviderProvided;
use lpa_core::keys::{CertificateProviderKey, LpaKey, PartitionKey, SortKey};
use lpa_core::ports::CertificateProviderStore;
use lpa_core::storage::{Result, StorageClient, StorageClientExt};

/// Reads the certificate provider aggregate.
pub struct StorageCertificateProviderStore {
    client: Arc<dyn StorageClient>,
}

impl StorageCertificateProviderStore {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CertificateProviderStore for StorageCertificateProviderStore {
    async fn one(&self, lpa_key: &LpaKey) -> Result<CertificateProviderProvided> {
        let prefix = SortKey::from(CertificateProviderKey::new("")).to_string();
        self.client
            .one_by_partial_sk_as(&PartitionKey::from(lpa_key.clone()), &prefix)
            .await
    }
}
