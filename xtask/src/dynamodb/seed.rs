//! Seed command implementation.

use super::error::{sdk_error, DynamodbError, Result};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Duration, Utc};
use lpa_core::domain::{CertificateProvider, Donor, DonorProvided, IdentityUserData, TaskState};
use lpa_core::keys::{DonorKey, LpaKey, LpaOwnerKey};
use lpa_core::scheduled::{Action, Event};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// A demo lpa and the events scheduled against it.
#[derive(Debug)]
pub struct SeedData {
    pub donor: DonorProvided,
    pub events: Vec<Event>,
}

/// Builds a donor with a confirmed identity and `count` due events, cycling
/// through every known action. Events are spread over the past few days so
/// the runner's overdue sweep has something to find.
pub fn generate_seed_data(
    lpa_id: &str,
    lpa_uid: &str,
    now: DateTime<Utc>,
    count: u32,
) -> SeedData {
    let donor = Donor {
        uid: Uuid::new_v4(),
        first_names: "Sam".to_string(),
        last_name: "Smith".to_string(),
        email: "sam.smith@example.com".to_string(),
        ..Default::default()
    };

    let mut provided = DonorProvided::new(
        LpaKey::new(lpa_id),
        LpaOwnerKey::donor(DonorKey::new(Uuid::new_v4().to_string())),
        lpa_uid,
        donor,
        now,
    );
    provided.certificate_provider = CertificateProvider {
        uid: Uuid::new_v4(),
        first_names: "Charlie".to_string(),
        last_name: "Cooper".to_string(),
        email: "charlie.cooper@example.com".to_string(),
        ..Default::default()
    };
    provided.identity_user_data = IdentityUserData::confirmed(now - Duration::days(180));
    provided.tasks.confirm_your_identity = TaskState::Completed;

    let events = (0..count)
        .map(|i| {
            let action = Action::KNOWN[i as usize % Action::KNOWN.len()];
            Event::new(
                now - Duration::days(i64::from(i % 3)) - Duration::minutes(i64::from(i)),
                action,
                provided.pk.clone(),
                provided.sk.clone(),
                lpa_uid,
                Uuid::new_v4(),
            )
        })
        .collect();

    SeedData {
        donor: provided,
        events,
    }
}

/// Writes the seed data, returning how many items were written.
pub async fn seed(client: &Client, table_name: &str, data: &SeedData) -> Result<usize> {
    let mut items = vec![to_item(&data.donor)?];
    for event in &data.events {
        items.push(to_item(event)?);
    }

    for item in &items {
        client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item.clone()))
            .send()
            .await
            .map_err(sdk_error)?;
    }

    Ok(items.len())
}

/// Serializes a record into DynamoDB attributes.
fn to_item<T: Serialize>(value: &T) -> Result<HashMap<String, AttributeValue>> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, json_to_attribute(value)))
            .collect()),
        other => Err(DynamodbError::Serialization(format!(
            "expected an object, got {other}"
        ))),
    }
}

fn json_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(values) => {
            AttributeValue::L(values.into_iter().map(json_to_attribute).collect())
        }
        Value::Object(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(name, value)| (name, json_to_attribute(value)))
                .collect(),
        ),
    }
}

/// One-line summary of an event for the confirmation listing.
pub fn format_event(event: &Event) -> String {
    format!("{} {}", event.at.format("%Y-%m-%d %H:%M"), event.action)
}
