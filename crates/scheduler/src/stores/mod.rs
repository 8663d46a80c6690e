//! Aggregate stores backed by a `StorageClient`.

mod attorney;
mod certificate_provider;
mod donor;
mod lpa;

pub use attorney::StorageAttorneyStore;
pub use certificate_provider::StorageCertificateProviderStore;
pub use donor::StorageDonorStore;
pub use lpa::StoreLpaResolver;
