//! Applies deploy and destroy plans to a live table.

use std::collections::BTreeSet;
use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode as SdkBillingMode, CreateGlobalSecondaryIndexAction,
    GlobalSecondaryIndex, GlobalSecondaryIndexUpdate, KeySchemaElement, KeyType, Projection,
    ProjectionType as SdkProjectionType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;

use super::client;
use super::config::{
    AttributeType, BillingMode, GsiConfig, KeyAttribute, ProjectionType, TableConfig,
};
use super::error::{sdk_error, DynamodbError, Result};
use super::planning::{DeployPlan, DestroyPlan};

const READY_POLL: Duration = Duration::from_secs(2);
const READY_ATTEMPTS: u32 = 60;

/// Execute a deploy plan, waiting for the table to settle after each change.
pub async fn execute_deploy_plan(client: &Client, plan: &DeployPlan) -> Result<()> {
    match plan {
        DeployPlan::CreateTable { config } => {
            create_table(client, config).await?;
            wait_until_ready(client, &config.table_name).await
        }
        DeployPlan::AddGsis {
            table_name,
            gsis_to_add,
        } => {
            // One index creation per UpdateTable call.
            for gsi in gsis_to_add {
                add_gsi(client, table_name, gsi).await?;
                wait_until_ready(client, table_name).await?;
            }
            Ok(())
        }
        DeployPlan::NoChanges { .. } => Ok(()),
    }
}

/// Execute a destroy plan.
pub async fn execute_destroy_plan(client: &Client, plan: &DestroyPlan) -> Result<()> {
    if let DestroyPlan::DeleteTable { table_name } = plan {
        client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(sdk_error)?;
    }

    Ok(())
}

async fn create_table(client: &Client, config: &TableConfig) -> Result<()> {
    let indexes = config
        .gsis
        .iter()
        .map(|gsi| {
            GlobalSecondaryIndex::builder()
                .index_name(&gsi.name)
                .set_key_schema(Some(key_schema(&gsi.partition_key, gsi.sort_key.as_ref())?))
                .projection(projection(&gsi.projection))
                .build()
                .map_err(sdk_error)
        })
        .collect::<Result<Vec<_>>>()?;

    client
        .create_table()
        .table_name(&config.table_name)
        .set_key_schema(Some(key_schema(
            &config.partition_key,
            config.sort_key.as_ref(),
        )?))
        .set_attribute_definitions(Some(attribute_definitions(table_attributes(config))?))
        .set_global_secondary_indexes((!indexes.is_empty()).then_some(indexes))
        .billing_mode(billing_mode(config.billing_mode))
        .send()
        .await
        .map_err(sdk_error)?;

    Ok(())
}

async fn add_gsi(client: &Client, table_name: &str, gsi: &GsiConfig) -> Result<()> {
    let create = CreateGlobalSecondaryIndexAction::builder()
        .index_name(&gsi.name)
        .set_key_schema(Some(key_schema(&gsi.partition_key, gsi.sort_key.as_ref())?))
        .projection(projection(&gsi.projection))
        .build()
        .map_err(sdk_error)?;

    client
        .update_table()
        .table_name(table_name)
        .set_attribute_definitions(Some(attribute_definitions(index_attributes(gsi))?))
        .global_secondary_index_updates(
            GlobalSecondaryIndexUpdate::builder().create(create).build(),
        )
        .send()
        .await
        .map_err(sdk_error)?;

    Ok(())
}

async fn wait_until_ready(client: &Client, table_name: &str) -> Result<()> {
    for _ in 0..READY_ATTEMPTS {
        let ready = client::get_table_state(client, table_name)
            .await?
            .is_some_and(|state| state.is_ready());
        if ready {
            return Ok(());
        }

        tokio::time::sleep(READY_POLL).await;
    }

    Err(DynamodbError::TableActivationTimeout)
}

/// Every key attribute of the table and its indexes, each named once.
fn table_attributes(config: &TableConfig) -> Vec<&KeyAttribute> {
    let mut attributes = vec![&config.partition_key];
    attributes.extend(&config.sort_key);
    for gsi in &config.gsis {
        attributes.extend(index_attributes(gsi));
    }

    let mut seen = BTreeSet::new();
    attributes.retain(|&attribute| seen.insert(attribute.name.as_str()));
    attributes
}

fn index_attributes(gsi: &GsiConfig) -> Vec<&KeyAttribute> {
    std::iter::once(&gsi.partition_key)
        .chain(&gsi.sort_key)
        .collect()
}

fn key_schema(
    partition: &KeyAttribute,
    sort: Option<&KeyAttribute>,
) -> Result<Vec<KeySchemaElement>> {
    std::iter::once((partition, KeyType::Hash))
        .chain(sort.map(|attribute| (attribute, KeyType::Range)))
        .map(|(attribute, key_type)| {
            KeySchemaElement::builder()
                .attribute_name(&attribute.name)
                .key_type(key_type)
                .build()
                .map_err(sdk_error)
        })
        .collect()
}

fn attribute_definitions(attributes: Vec<&KeyAttribute>) -> Result<Vec<AttributeDefinition>> {
    attributes
        .into_iter()
        .map(|attribute| {
            AttributeDefinition::builder()
                .attribute_name(&attribute.name)
                .attribute_type(scalar_type(attribute.attribute_type))
                .build()
                .map_err(sdk_error)
        })
        .collect()
}

fn scalar_type(attribute_type: AttributeType) -> ScalarAttributeType {
    match attribute_type {
        AttributeType::String => ScalarAttributeType::S,
    }
}

fn billing_mode(mode: BillingMode) -> SdkBillingMode {
    match mode {
        BillingMode::PayPerRequest => SdkBillingMode::PayPerRequest,
    }
}

fn projection(projection: &ProjectionType) -> Projection {
    let projection_type = match projection {
        ProjectionType::All => SdkProjectionType::All,
        ProjectionType::KeysOnly => SdkProjectionType::KeysOnly,
    };

    Projection::builder().projection_type(projection_type).build()
}
