//! Composite keys restricted to a subset of kinds.

use std::fmt;

use super::kinds::{
    AttorneyShareKey, CertificateProviderShareKey, DonorKey, DonorShareKey, OrganisationKey,
};
use super::{KeyError, PartitionKey, SortKey};

/// The sort key of whoever owns an lpa: a donor, or the organisation that
/// created it on the donor's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LpaOwnerKey(SortKey);

impl LpaOwnerKey {
    const EXPECTED: &'static str = "lpa owner";

    pub fn donor(key: DonorKey) -> Self {
        Self(SortKey::Donor(key))
    }

    pub fn organisation(key: OrganisationKey) -> Self {
        Self(SortKey::Organisation(key))
    }

    pub fn decode(s: &str) -> Result<Self, KeyError> {
        SortKey::decode(s).and_then(Self::try_from)
    }

    pub fn sort_key(&self) -> &SortKey {
        &self.0
    }

    pub fn is_organisation(&self) -> bool {
        matches!(self.0, SortKey::Organisation(_))
    }
}

impl TryFrom<SortKey> for LpaOwnerKey {
    type Error = KeyError;

    fn try_from(key: SortKey) -> Result<Self, Self::Error> {
        match key {
            SortKey::Donor(_) | SortKey::Organisation(_) => Ok(Self(key)),
            other => Err(KeyError::NotPermitted {
                key: other.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl From<LpaOwnerKey> for SortKey {
    fn from(key: LpaOwnerKey) -> Self {
        key.0
    }
}

impl fmt::Display for LpaOwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

string_codec!(LpaOwnerKey, LpaOwnerKey::decode);

/// The partition key of a share code, for any actor type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShareKey(PartitionKey);

impl ShareKey {
    const EXPECTED: &'static str = "share code";

    pub fn decode(s: &str) -> Result<Self, KeyError> {
        PartitionKey::decode(s).and_then(Self::try_from)
    }

    pub fn partition_key(&self) -> &PartitionKey {
        &self.0
    }

    /// The share code itself, without the actor specific prefix.
    pub fn code(&self) -> &str {
        match &self.0 {
            PartitionKey::DonorShare(key) => key.id(),
            PartitionKey::CertificateProviderShare(key) => key.id(),
            PartitionKey::AttorneyShare(key) => key.id(),
            // Unreachable by construction; every constructor checks the kind.
            _ => "",
        }
    }
}

impl From<DonorShareKey> for ShareKey {
    fn from(key: DonorShareKey) -> Self {
        Self(key.into())
    }
}

impl From<CertificateProviderShareKey> for ShareKey {
    fn from(key: CertificateProviderShareKey) -> Self {
        Self(key.into())
    }
}

impl From<AttorneyShareKey> for ShareKey {
    fn from(key: AttorneyShareKey) -> Self {
        Self(key.into())
    }
}

impl TryFrom<PartitionKey> for ShareKey {
    type Error = KeyError;

    fn try_from(key: PartitionKey) -> Result<Self, Self::Error> {
        match key {
            PartitionKey::DonorShare(_)
            | PartitionKey::CertificateProviderShare(_)
            | PartitionKey::AttorneyShare(_) => Ok(Self(key)),
            other => Err(KeyError::NotPermitted {
                key: other.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl fmt::Display for ShareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

string_codec!(ShareKey, ShareKey::decode);
