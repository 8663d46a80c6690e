use std::fmt;

use serde::{Deserialize, Serialize};

use super::{KeyError, PartitionKey, SortKey};

/// A full record address.
///
/// Serializes as `{"PK": "...", "SK": "..."}`, which is also the shape of the
/// key attributes on every stored item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Keys {
    #[serde(rename = "PK")]
    pub pk: PartitionKey,
    #[serde(rename = "SK")]
    pub sk: SortKey,
}

impl Keys {
    pub fn new(pk: impl Into<PartitionKey>, sk: impl Into<SortKey>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

impl fmt::Display for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pk, self.sk)
    }
}

/// Either half of a key, tagged with its position.
///
/// Used where the position is not known statically, such as generic event
/// payloads. The tag decides which registry decodes the canonical string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "position", content = "key", rename_all = "lowercase")]
pub enum AnyKey {
    Partition(PartitionKey),
    Sort(SortKey),
}

impl AnyKey {
    /// Decodes a canonical string for the given position.
    pub fn decode_partition(s: &str) -> Result<Self, KeyError> {
        PartitionKey::decode(s).map(AnyKey::Partition)
    }

    pub fn decode_sort(s: &str) -> Result<Self, KeyError> {
        SortKey::decode(s).map(AnyKey::Sort)
    }
}

impl fmt::Display for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyKey::Partition(key) => fmt::Display::fmt(key, f),
            AnyKey::Sort(key) => fmt::Display::fmt(key, f),
        }
    }
}
