use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::keys::{Keys, PartitionKey, SortKey};

use super::{Result, StoreError};

/// A raw stored record: attribute name to value.
pub type Item = Map<String, Value>;

pub const PK_ATTRIBUTE: &str = "PK";
pub const SK_ATTRIBUTE: &str = "SK";
pub const LPA_UID_ATTRIBUTE: &str = "LpaUID";
pub const UPDATED_AT_ATTRIBUTE: &str = "UpdatedAt";
pub const VERSION_ATTRIBUTE: &str = "Version";

/// Serializes a value into an item. The value must serialize as a map.
pub fn to_item<T: Serialize + ?Sized>(value: &T) -> Result<Item> {
    match serde_json::to_value(value)? {
        Value::Object(item) => Ok(item),
        other => Err(StoreError::InvalidData(format!(
            "expected an object but got {other}"
        ))),
    }
}

/// Deserializes an item into a value.
pub fn from_item<T: DeserializeOwned>(item: Item) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(item))?)
}

fn string_attribute<'a>(item: &'a Item, name: &str) -> Result<&'a str> {
    item.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::InvalidData(format!("missing string attribute {name}")))
}

/// Reads and decodes the key attributes of an item.
pub fn item_keys(item: &Item) -> Result<Keys> {
    Ok(Keys {
        pk: PartitionKey::decode(string_attribute(item, PK_ATTRIBUTE)?)?,
        sk: SortKey::decode(string_attribute(item, SK_ATTRIBUTE)?)?,
    })
}

/// Reads the lpa uid an item is indexed under, if any.
pub fn item_lpa_uid(item: &Item) -> Option<&str> {
    item.get(LPA_UID_ATTRIBUTE)
        .and_then(Value::as_str)
        .filter(|uid| !uid.is_empty())
}

/// Reads the optimistic lock version of an item, if it carries one.
pub fn item_version(item: &Item) -> Result<Option<u64>> {
    match item.get(VERSION_ATTRIBUTE) {
        None => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            StoreError::InvalidData(format!("{VERSION_ATTRIBUTE} must be a non-negative integer"))
        }),
    }
}

/// Increments the version of a versioned item, returning the version the
/// stored copy must currently have for the write to succeed.
pub fn bump_version(item: &mut Item) -> Result<Option<u64>> {
    let current = item_version(item)?;
    if let Some(version) = current {
        item.insert(VERSION_ATTRIBUTE.to_string(), Value::from(version + 1));
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(rename = "PK")]
        pk: String,
        #[serde(rename = "SK")]
        sk: String,
        #[serde(rename = "Name")]
        name: String,
    }

    fn record() -> Record {
        Record {
            pk: "LPA#a".to_string(),
            sk: "DONOR#b".to_string(),
            name: "x".to_string(),
        }
    }

    #[test]
    fn test_item_round_trip() {
        let item = to_item(&record()).unwrap();
        assert_eq!(item.get("Name"), Some(&json!("x")));
        assert_eq!(from_item::<Record>(item).unwrap(), record());
    }

    #[test]
    fn test_to_item_rejects_non_objects() {
        assert!(matches!(to_item(&5), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_item_keys_decodes_both_halves() {
        let item = to_item(&record()).unwrap();
        let keys = item_keys(&item).unwrap();
        assert_eq!(keys.to_string(), "LPA#a/DONOR#b");
    }

    #[test]
    fn test_item_keys_reports_malformed_keys() {
        let mut item = to_item(&record()).unwrap();
        item.insert("SK".to_string(), json!("WHAT#b"));
        assert!(matches!(item_keys(&item), Err(StoreError::MalformedKey(_))));

        item.remove("SK");
        assert!(matches!(item_keys(&item), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_bump_version_only_touches_versioned_items() {
        let mut item = to_item(&record()).unwrap();
        assert_eq!(bump_version(&mut item).unwrap(), None);
        assert!(!item.contains_key("Version"));

        item.insert("Version".to_string(), json!(3));
        assert_eq!(bump_version(&mut item).unwrap(), Some(3));
        assert_eq!(item.get("Version"), Some(&json!(4)));
    }

    #[test]
    fn test_item_version_rejects_non_numbers() {
        let mut item = Item::new();
        item.insert("Version".to_string(), json!("one"));
        assert!(item_version(&item).is_err());
    }

    #[test]
    fn test_item_lpa_uid_ignores_empty() {
        let mut item = Item::new();
        assert_eq!(item_lpa_uid(&item), None);
        item.insert("LpaUID".to_string(), json!(""));
        assert_eq!(item_lpa_uid(&item), None);
        item.insert("LpaUID".to_string(), json!("M-1"));
        assert_eq!(item_lpa_uid(&item), Some("M-1"));
    }
}
