//! `cargo xtask dynamodb`: manage the lpa table and seed demo data.

mod client;
mod config;
mod deploy;
mod error;
mod planning;
mod seed;

pub use error::{DynamodbError, Result};

use aws_sdk_dynamodb::Client;
use dialoguer::Confirm;

use crate::prelude::*;
use crate::Global;

#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Create the lpa table and its indexes, or destroy it.
    Deploy(DeployCommand),

    /// Insert a demo lpa with due scheduled events.
    Seed(SeedCommand),
}

/// Table selection shared by every subcommand. Honours the same variable as
/// the scheduler, so both point at one table.
#[derive(Debug, clap::Args)]
pub struct TableArgs {
    #[arg(long, env = "DYNAMODB_TABLE_NAME", default_value = "lpa")]
    pub table_name: String,

    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, clap::Parser)]
#[command(long_about = "Create the lpa table with the LpaUIDIndex and \
SKUpdatedAtIndex indexes, or add whichever index is missing. Prints the plan \
and asks before applying. Set AWS_ENDPOINT_URL to target DynamoDB Local.")]
pub struct DeployCommand {
    /// Delete the table instead.
    #[arg(long)]
    pub destroy: bool,

    #[command(flatten)]
    pub table: TableArgs,
}

#[derive(Debug, clap::Parser)]
#[command(long_about = "Insert a donor whose identity is confirmed but who has \
not signed, plus events due over the last few days cycling through every \
action. A scheduler run afterwards expires the identity and ignores the \
reminders.")]
pub struct SeedCommand {
    /// Lpa id to seed (defaults to a new UUID).
    #[arg(long)]
    pub lpa_id: Option<String>,

    /// Lpa reference number stored on every item.
    #[arg(long, default_value = "M-0000-0000-0001")]
    pub lpa_uid: String,

    /// Number of events to schedule.
    #[arg(long, default_value_t = 4)]
    pub count: u32,

    #[command(flatten)]
    pub table: TableArgs,
}

pub async fn run(command: DynamodbCommand, global: Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();
    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
    }
    let dynamo = client::create_client(&aws_config).await;

    match command.action {
        DynamodbAction::Deploy(cmd) if cmd.destroy => destroy(&dynamo, &cmd.table, &global).await,
        DynamodbAction::Deploy(cmd) => deploy(&dynamo, &cmd.table, &global).await,
        DynamodbAction::Seed(cmd) => seed(&dynamo, cmd, &global).await,
    }
}

async fn deploy(dynamo: &Client, table: &TableArgs, global: &Global) -> Result<()> {
    let current = client::get_table_state(dynamo, &table.table_name).await?;
    let desired = config::lpa_table_config().with_table_name(&table.table_name);
    let plan = planning::calculate_deploy_plan(current.as_ref(), &desired);

    if !global.is_silent() {
        aprintln!("{}", p_c("Deploy Plan:"));
        for line in planning::format_deploy_plan(&plan) {
            let painted = match line.chars().next() {
                Some('+') => p_g(&line),
                Some('-') => p_r(&line),
                Some('~') => p_y(&line),
                _ => line.clone(),
            };
            aprintln!("  {}", painted);
        }
    }

    if matches!(plan, planning::DeployPlan::NoChanges { .. }) {
        say(global, p_g("Infrastructure is up to date."));
        return Ok(());
    }

    confirm("Apply these changes?", true, table.force)?;
    say(global, p_b("Applying changes..."));
    deploy::execute_deploy_plan(dynamo, &plan).await?;
    say(global, p_g("Infrastructure deployed successfully."));

    Ok(())
}

async fn destroy(dynamo: &Client, table: &TableArgs, global: &Global) -> Result<()> {
    let current = client::get_table_state(dynamo, &table.table_name).await?;
    let plan = planning::calculate_destroy_plan(current.as_ref(), &table.table_name);

    if !global.is_silent() {
        aprintln!("{}", p_y("Destroy Plan:"));
        for line in planning::format_destroy_plan(&plan) {
            aprintln!("  {}", p_r(&line));
        }
    }

    if matches!(plan, planning::DestroyPlan::AlreadyGone { .. }) {
        say(global, p_g("Nothing to destroy."));
        return Ok(());
    }

    confirm(
        "Delete this table? ALL DATA WILL BE LOST",
        false,
        table.force,
    )?;
    deploy::execute_destroy_plan(dynamo, &plan).await?;
    say(global, p_g("Table destroyed."));

    Ok(())
}

async fn seed(dynamo: &Client, cmd: SeedCommand, global: &Global) -> Result<()> {
    let table_name = cmd.table.table_name;
    if client::get_table_state(dynamo, &table_name).await?.is_none() {
        return Err(DynamodbError::TableNotFound { table_name });
    }

    let lpa_id = cmd
        .lpa_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let data = seed::generate_seed_data(&lpa_id, &cmd.lpa_uid, chrono::Utc::now(), cmd.count);

    if !global.is_silent() {
        aprintln!("{} {} ({})", p_b("Lpa:"), lpa_id, cmd.lpa_uid);
        aprintln!("{}", p_c("Events to schedule:"));
        for event in &data.events {
            aprintln!("  {}", seed::format_event(event));
        }
    }

    confirm(
        &format!("Insert the lpa and {} events?", data.events.len()),
        true,
        cmd.table.force,
    )?;
    let inserted = seed::seed(dynamo, &table_name, &data).await?;
    say(global, format!("{} {} items inserted.", p_g("Success:"), inserted));

    Ok(())
}

fn confirm(prompt: &str, default: bool, force: bool) -> Result<()> {
    if force {
        return Ok(());
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?;

    if confirmed {
        Ok(())
    } else {
        Err(DynamodbError::UserCancelled)
    }
}

fn say(global: &Global, message: String) {
    if !global.is_silent() {
        aprintln!("{}", message);
    }
}
