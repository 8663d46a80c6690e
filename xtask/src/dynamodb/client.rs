//! Connects to DynamoDB and reads back live table state.

use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{IndexStatus, TableStatus as SdkTableStatus};
use aws_sdk_dynamodb::Client;

use super::error::{sdk_error, Result};
use super::planning::{GsiState, GsiStatus, TableState, TableStatus};

/// Where the xtask commands point, read from the standard AWS variables.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// Set for DynamoDB Local.
    pub endpoint_url: Option<String>,
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        }
    }
}

impl AwsConfig {
    /// Human-readable target, printed before anything is changed.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({url})"),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

pub async fn create_client(config: &AwsConfig) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    Client::new(&loader.load().await)
}

/// The table's current state, or `None` when it does not exist.
pub async fn get_table_state(client: &Client, table_name: &str) -> Result<Option<TableState>> {
    let response = match client.describe_table().table_name(table_name).send().await {
        Ok(response) => response,
        Err(err) => {
            return match err.into_service_error() {
                DescribeTableError::ResourceNotFoundException(_) => Ok(None),
                err => Err(sdk_error(err)),
            }
        }
    };

    let Some(table) = response.table() else {
        return Ok(None);
    };

    let gsis = table
        .global_secondary_indexes()
        .iter()
        .map(|gsi| GsiState {
            name: gsi.index_name().unwrap_or_default().to_string(),
            status: gsi.index_status().map_or(GsiStatus::Active, gsi_status),
        })
        .collect();

    Ok(Some(TableState {
        status: table.table_status().map_or(TableStatus::Active, table_status),
        gsis,
    }))
}

fn table_status(status: &SdkTableStatus) -> TableStatus {
    match status {
        SdkTableStatus::Creating => TableStatus::Creating,
        SdkTableStatus::Updating => TableStatus::Updating,
        SdkTableStatus::Deleting => TableStatus::Deleting,
        _ => TableStatus::Active,
    }
}

fn gsi_status(status: &IndexStatus) -> GsiStatus {
    match status {
        IndexStatus::Creating => GsiStatus::Creating,
        IndexStatus::Updating => GsiStatus::Updating,
        IndexStatus::Deleting => GsiStatus::Deleting,
        _ => GsiStatus::Active,
    }
}
