use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lpa_core::ports::{Bundle, Clock, EventClient, SystemClock};
use lpa_core::storage::StorageClient;
use lpa_scheduler::clients::{
    StaticBundle, TracingEventClient, TracingMetricsClient, TracingNotifyClient,
};
use lpa_scheduler::config::Config;
use lpa_scheduler::scheduled::{action_handlers, BackoffWaiter, Runner, ScheduleStore, StepDeps};
use lpa_scheduler::stores::{
    StorageAttorneyStore, StorageCertificateProviderStore, StorageDonorStore, StoreLpaResolver,
};

/// Drains the schedule of due lasting power of attorney actions
#[derive(Parser, Debug)]
#[command(name = "lpa-scheduler")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Table holding every record
    #[arg(long, env = "DYNAMODB_TABLE_NAME")]
    table_name: Option<String>,

    /// Overdue day buckets to sweep
    #[arg(long, env = "SCHEDULE_LOOKBACK_DAYS")]
    lookback_days: Option<u32>,

    /// Consecutive storage errors tolerated before giving up
    #[arg(long, env = "WAITER_MAX_RETRIES")]
    max_retries: Option<u32>,

    /// Publish drain metrics
    #[arg(long)]
    metrics: bool,

    /// Log as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.json_logs || std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json"));

    let mut config = Config::from_env();
    if let Some(table_name) = cli.table_name {
        config.table_name = table_name;
    }
    if let Some(lookback_days) = cli.lookback_days {
        config.lookback_days = lookback_days;
    }
    if let Some(max_retries) = cli.max_retries {
        config.max_retries = max_retries;
    }
    config.metrics_enabled |= cli.metrics;

    tracing::info!(
        table_name = %config.table_name,
        lookback_days = config.lookback_days,
        max_retries = config.max_retries,
        metrics_enabled = config.metrics_enabled,
        "Starting scheduler"
    );

    let client = create_storage(&config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let event_client: Arc<dyn EventClient> = Arc::new(TracingEventClient);
    let bundle: Arc<dyn Bundle> = Arc::new(StaticBundle::new());
    let certificate_provider_store = Arc::new(StorageCertificateProviderStore::new(client.clone()));

    let deps = StepDeps {
        donor_store: Arc::new(StorageDonorStore::new(client.clone(), clock.clone())),
        certificate_provider_store: certificate_provider_store.clone(),
        attorney_store: Arc::new(StorageAttorneyStore::new(client.clone())),
        lpa_resolver: Arc::new(StoreLpaResolver::new(certificate_provider_store)),
        notify_client: Arc::new(TracingNotifyClient::new(
            event_client.clone(),
            bundle.clone(),
        )),
        event_client,
        bundle,
        clock: clock.clone(),
        app_public_url: config.app_public_url.clone(),
    };

    let queue = Arc::new(ScheduleStore::new(client, clock.clone(), config.lookback_days));
    let waiter = Box::new(BackoffWaiter::new(config.backoff(), config.max_retries));

    let mut runner = Runner::new(
        queue,
        waiter,
        clock,
        action_handlers(Arc::new(deps)),
        Arc::new(TracingMetricsClient),
        config.metrics_enabled,
    );

    runner.run().await?;

    tracing::info!("Scheduler finished");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lpa_scheduler=info".into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[cfg(feature = "inmemory")]
async fn create_storage(_config: &Config) -> Result<Arc<dyn StorageClient>> {
    use lpa_scheduler::storage::InMemoryClient;

    tracing::info!("Using in-memory storage");
    Ok(Arc::new(InMemoryClient::new()))
}

#[cfg(feature = "dynamodb")]
async fn create_storage(config: &Config) -> Result<Arc<dyn StorageClient>> {
    use lpa_scheduler::storage::DynamoDbClient;

    let storage = DynamoDbClient::connect(&config.table_name).await?;
    tracing::info!(table_name = storage.table_name(), "Using DynamoDB storage");
    Ok(Arc::new(storage))
}
