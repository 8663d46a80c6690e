//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! the JSON items the rest of the crate works with. These are testable in
//! isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Number, Value};

use lpa_core::keys::Keys;
use lpa_core::storage::{Item, Result, StoreError, PK_ATTRIBUTE, SK_ATTRIBUTE};

pub type AttributeMap = HashMap<String, AttributeValue>;

// ============================================================================
// JSON -> DynamoDB
// ============================================================================

/// Convert a JSON value to an attribute value.
pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert an item to a DynamoDB attribute map.
pub fn item_to_attributes(item: &Item) -> AttributeMap {
    item.iter()
        .map(|(k, v)| (k.clone(), json_to_attribute(v)))
        .collect()
}

/// The primary key attributes for `keys`.
pub fn keys_to_attributes(keys: &Keys) -> AttributeMap {
    HashMap::from([
        (PK_ATTRIBUTE.to_string(), AttributeValue::S(keys.pk.to_string())),
        (SK_ATTRIBUTE.to_string(), AttributeValue::S(keys.sk.to_string())),
    ])
}

// ============================================================================
// DynamoDB -> JSON
// ============================================================================

/// Convert an attribute value to a JSON value.
pub fn attribute_to_json(value: &AttributeValue) -> Result<Value> {
    Ok(match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        AttributeValue::M(map) => Value::Object(attributes_to_item(map)?),
        AttributeValue::Ss(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<Vec<_>>>()?,
        ),
        other => {
            return Err(StoreError::InvalidData(format!(
                "Unsupported attribute type: {:?}",
                other
            )))
        }
    })
}

/// Convert a DynamoDB attribute map to an item.
pub fn attributes_to_item(attributes: &AttributeMap) -> Result<Item> {
    attributes
        .iter()
        .map(|(k, v)| attribute_to_json(v).map(|v| (k.clone(), v)))
        .collect()
}

/// Read the primary key of a key-only projection.
pub fn attributes_to_keys(attributes: &AttributeMap) -> Result<Keys> {
    let pk = get_string(attributes, PK_ATTRIBUTE)?;
    let sk = get_string(attributes, SK_ATTRIBUTE)?;
    Ok(Keys {
        pk: pk.parse()?,
        sk: sk.parse()?,
    })
}

fn parse_number(n: &str) -> Result<Number> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(Number::from(u));
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| StoreError::InvalidData(format!("Invalid number: {}", n)))
}

fn get_string(attributes: &AttributeMap, key: &str) -> Result<String> {
    attributes
        .get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpa_core::keys::{DonorKey, LpaKey};
    use lpa_core::storage::to_item;
    use serde_json::json;

    #[test]
    fn test_item_round_trip_through_attributes() {
        let item = to_item(&json!({
            "PK": "LPA#a",
            "SK": "DONOR#b",
            "Version": 3,
            "Score": 1.5,
            "Signed": true,
            "SubmittedAt": null,
            "Donor": {"FirstNames": "Sam", "Tags": ["a", "b"]},
        }))
        .unwrap();

        let attributes = item_to_attributes(&item);
        assert_eq!(attributes.get("Version"), Some(&AttributeValue::N("3".into())));
        assert_eq!(attributes.get("SubmittedAt"), Some(&AttributeValue::Null(true)));

        assert_eq!(attributes_to_item(&attributes).unwrap(), item);
    }

    #[test]
    fn test_string_sets_become_arrays() {
        let value = attribute_to_json(&AttributeValue::Ss(vec!["x".into()])).unwrap();
        assert_eq!(value, json!(["x"]));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = attribute_to_json(&AttributeValue::N("one".into())).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn test_keys_attributes() {
        let keys = Keys::new(LpaKey::new("a"), DonorKey::new("b"));
        let attributes = keys_to_attributes(&keys);
        assert_eq!(attributes_to_keys(&attributes).unwrap(), keys);

        let missing = HashMap::from([("PK".to_string(), AttributeValue::S("LPA#a".into()))]);
        assert!(attributes_to_keys(&missing).is_err());
    }
}
