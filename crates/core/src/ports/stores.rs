use async_trait::async_trait;

use crate::domain::{AttorneyProvided, CertificateProviderProvided, DonorProvided, Lpa};
use crate::keys::{LpaKey, LpaOwnerKey};
use crate::storage::Result;

/// Access to the donor's aggregate.
#[async_trait]
pub trait DonorStore: Send + Sync {
    /// Gets the donor data for an lpa.
    async fn one(&self, lpa_key: &LpaKey, owner_key: &LpaOwnerKey) -> Result<DonorProvided>;

    /// Saves the donor data, failing if it changed since it was read.
    async fn put(&self, donor: &DonorProvided) -> Result<()>;
}

/// Access to the certificate provider's aggregate.
#[async_trait]
pub trait CertificateProviderStore: Send + Sync {
    /// Gets the certificate provider data for an lpa.
    async fn one(&self, lpa_key: &LpaKey) -> Result<CertificateProviderProvided>;
}

/// Access to the attorneys' aggregates.
#[async_trait]
pub trait AttorneyStore: Send + Sync {
    /// Gets the data every attorney of an lpa has provided. Attorneys that
    /// have not started are absent.
    async fn all(&self, lpa_uid: &str) -> Result<Vec<AttorneyProvided>>;
}

/// Builds the read model of an lpa.
#[async_trait]
pub trait LpaResolver: Send + Sync {
    async fn resolve(&self, donor: &DonorProvided) -> Result<Lpa>;
}
