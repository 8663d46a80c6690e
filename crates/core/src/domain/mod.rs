//! Aggregates the scheduled actions read and mutate, and the resolved read
//! model assembled from them.

mod actor;
mod attorney;
mod certificate_provider;
mod donor;
mod identity;
mod language;
mod lpa;
mod task;

pub use actor::{
    ActorType, Address, Attorney, Attorneys, CertificateProvider, Correspondent, Donor,
    TrustCorporation,
};
pub use attorney::AttorneyProvided;
pub use certificate_provider::{CertificateProviderProvided, CertificateProviderTasks};
pub use donor::{DonorProvided, DonorTasks};
pub use identity::{IdentityStatus, IdentityUserData};
pub use language::{Channel, Language};
pub use lpa::{Lpa, LpaType};
pub use task::TaskState;
