//! Storage contract shared by every backend.

mod error;
mod traits;
mod transaction;
mod types;

pub use error::{Result, StoreError};
pub use traits::{StorageClient, StorageClientExt};
pub use transaction::{Transaction, MAX_TRANSACTION_ITEMS};
pub use types::{
    bump_version, from_item, item_keys, item_lpa_uid, item_version, to_item, Item,
    LPA_UID_ATTRIBUTE, PK_ATTRIBUTE, SK_ATTRIBUTE, UPDATED_AT_ATTRIBUTE, VERSION_ATTRIBUTE,
};
