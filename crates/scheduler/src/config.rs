use std::{env, time::Duration};

/// Scheduler configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table holding every record (default: "lpa")
    pub table_name: String,
    /// How many days before today are still swept for due events (default: 7)
    pub lookback_days: u32,
    /// Storage errors tolerated in a row before a drain gives up (default: 10)
    pub max_retries: u32,
    /// Base unit for the randomized backoff, in milliseconds (default: 1,000)
    pub backoff_ms: u64,
    /// Whether drain metrics are published (default: false)
    pub metrics_enabled: bool,
    /// Public base URL used in links sent to actors
    pub app_public_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNAMODB_TABLE_NAME` - Table name (default: "lpa")
    /// - `SCHEDULE_LOOKBACK_DAYS` - Overdue day buckets to sweep (default: 7)
    /// - `WAITER_MAX_RETRIES` - Consecutive storage errors allowed (default: 10)
    /// - `WAITER_BACKOFF_MS` - Backoff unit in milliseconds (default: 1,000)
    /// - `METRICS_ENABLED` - Publish drain metrics (default: false)
    /// - `APP_PUBLIC_URL` - Public base URL (default: "http://localhost:5050")
    pub fn from_env() -> Self {
        Self {
            table_name: env::var("DYNAMODB_TABLE_NAME").unwrap_or_else(|_| "lpa".to_string()),
            lookback_days: env::var("SCHEDULE_LOOKBACK_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            max_retries: env::var("WAITER_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            backoff_ms: env::var("WAITER_BACKOFF_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
            metrics_enabled: env::var("METRICS_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            app_public_url: env::var("APP_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:5050".to_string()),
        }
    }

    /// Get the backoff unit as a Duration.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
