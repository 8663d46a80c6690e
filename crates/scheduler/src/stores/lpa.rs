use std::sync::Arc;

use async_trait::async_trait;

use lpa_core::domain::{DonorProvided, Lpa};
use lpa_core::ports::{CertificateProviderStore, LpaResolver};
use lpa_core::storage::Result;

/// Builds the lpa read model from the donor aggregate, overlaid with what
/// the certificate provider has provided so far.
pub struct StoreLpaResolver {
    certificate_provider_store: Arc<dyn CertificateProviderStore>,
}

impl StoreLpaResolver {
    pub fn new(certificate_provider_store: Arc<dyn CertificateProviderStore>) -> Self {
        Self {
            certificate_provider_store,
        }
    }
}

#[async_trait]
impl LpaResolver for StoreLpaResolver {
    async fn resolve(&self, donor: &DonorProvided) -> Result<Lpa> {
        let mut lpa = Lpa {
            lpa_id: donor.lpa_id.clone(),
            lpa_uid: donor.lpa_uid.clone(),
            lpa_type: donor.lpa_type,
            donor: donor.donor.clone(),
            correspondent: donor.correspondent.clone(),
            certificate_provider: donor.certificate_provider.clone(),
            attorneys: donor.attorneys.clone(),
            replacement_attorneys: donor.replacement_attorneys.clone(),
            signed_at: donor.signed_at,
            submitted: donor.submitted_at.is_some(),
            certificate_provider_invited_at: donor.certificate_provider_invited_at,
            attorneys_invited_at: donor.attorneys_invited_at,
        };

        match self.certificate_provider_store.one(&donor.pk).await {
            Ok(provided) => {
                lpa.certificate_provider.signed_at = provided.signed_at;
                if provided.contact_language_preference.is_some() {
                    lpa.certificate_provider.contact_language_preference =
                        provided.contact_language_preference;
                }
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        Ok(lpa)
    }
}
