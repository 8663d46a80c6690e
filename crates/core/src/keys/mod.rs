//! Typed storage keys.
//!
//! Every record is addressed by a partition key and a sort key. Each half is
//! one of a closed set of kinds, and every kind renders as a fixed literal
//! prefix followed by its payload (`LPA#<id>`, `DONOR#<id>`, ...). Decoding
//! dispatches on the prefix and never panics: unknown prefixes and malformed
//! payloads are reported as [`KeyError`].
//!
//! Keys have three interchangeable external forms which all carry the same
//! canonical string:
//!
//! - `Display`/`FromStr`
//! - a plain string field in serialized documents
//! - the [`Keys`]/[`AnyKey`] wrappers for untyped contexts

#[macro_use]
mod macros;

mod error;
mod kinds;
mod owner;
mod sets;
mod wrapper;

pub use error::KeyError;
pub use kinds::{
    AttorneyKey, AttorneyShareKey, CertificateProviderKey, CertificateProviderShareKey,
    DocumentKey, DonorInviteKey, DonorKey, DonorShareKey, EvidenceReceivedKey, HandledDayKey,
    LpaKey, MemberIdKey, MemberInviteKey, MemberKey, MetadataKey, OrganisationKey,
    ScheduledDayKey, ScheduledKey, SubKey,
};
pub use owner::{LpaOwnerKey, ShareKey};
pub use sets::{PartitionKey, SortKey};
pub use wrapper::{AnyKey, Keys};

/// A single key kind: a literal prefix plus a payload.
pub trait KeyKind: Sized {
    /// The literal every encoded key of this kind starts with.
    const PREFIX: &'static str;

    /// The part of the encoded key after the prefix.
    fn payload(&self) -> String;

    /// Parses the part of an encoded key after the prefix.
    fn from_payload(payload: &str) -> Result<Self, KeyError>;

    /// Decodes a full key string of this kind.
    fn decode(s: &str) -> Result<Self, KeyError> {
        match s.strip_prefix(Self::PREFIX) {
            Some(payload) => Self::from_payload(payload),
            None => Err(KeyError::NotPermitted {
                key: s.to_string(),
                expected: Self::PREFIX,
            }),
        }
    }
}
