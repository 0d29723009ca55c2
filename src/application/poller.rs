// Account poller - Periodic refresh of one provider account
use crate::application::projection::SensorProjection;
use crate::application::provider_client::ProviderClient;
use crate::domain::record::Dataset;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Delay before the very first refresh, bridging platform startup latency.
const STARTUP_DELAY: Duration = Duration::from_secs(5);

/// Result of one poll cycle. Outcomes are logged, never propagated; recovery
/// from a failure is the next scheduled tick.
#[derive(Debug, PartialEq)]
pub enum RefreshOutcome {
    Updated { records: usize },
    Failed(String),
    Skipped,
}

/// One remote subscription: a scraper client plus the freshest dataset it has
/// produced. Credentials live inside the client and are immutable after
/// construction. The dataset is replaced wholesale on each successful refresh.
pub struct Account {
    username: String,
    attribution: String,
    client: Arc<dyn ProviderClient>,
    scan_interval: Duration,
    dataset: RwLock<Option<Dataset>>,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
    refresh_guard: Mutex<()>,
}

impl Account {
    pub fn new(
        username: String,
        attribution: String,
        client: Arc<dyn ProviderClient>,
        scan_interval: Duration,
    ) -> Self {
        Self {
            username,
            attribution,
            client,
            scan_interval,
            dataset: RwLock::new(None),
            last_refresh: RwLock::new(None),
            refresh_guard: Mutex::new(()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    pub fn declared_fields(&self) -> &[&str] {
        self.client.declared_fields()
    }

    /// The cached dataset, or `None` before the first successful refresh.
    pub async fn current_dataset(&self) -> Option<Dataset> {
        self.dataset.read().await.clone()
    }

    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.read().await
    }
}

/// Drives the refresh schedule for one account and fans change notifications
/// out to the sensors projecting from it.
pub struct AccountPoller {
    account: Arc<Account>,
    sensors: Vec<Arc<SensorProjection>>,
}

impl AccountPoller {
    pub fn new(account: Arc<Account>, sensors: Vec<Arc<SensorProjection>>) -> Self {
        Self { account, sensors }
    }

    /// Runs for the lifetime of the process: one refresh shortly after
    /// startup, then one per scan interval. There is no teardown path.
    pub async fn run(self) {
        tokio::time::sleep(STARTUP_DELAY).await;
        self.refresh().await;

        let mut ticks = tokio::time::interval(self.account.scan_interval);
        ticks.tick().await; // the first tick fires immediately
        loop {
            ticks.tick().await;
            self.refresh().await;
        }
    }

    /// One poll cycle: fetch, swap the cached dataset, notify sensors. Any
    /// fetch failure leaves the previous dataset in place. An overlapping
    /// invocation (slow scrape still in flight) is skipped rather than queued.
    pub async fn refresh(&self) -> RefreshOutcome {
        let provider = self.account.provider_name();

        let Ok(_in_flight) = self.account.refresh_guard.try_lock() else {
            tracing::debug!(provider, "refresh already in flight, skipping tick");
            return RefreshOutcome::Skipped;
        };

        tracing::debug!(provider, "querying scraper for new data");
        let dataset = match self.account.client.fetch().await {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::error!(provider, error = %e, "refresh failed, keeping previous data");
                return RefreshOutcome::Failed(e.to_string());
            }
        };

        let records = dataset.len();
        *self.account.dataset.write().await = Some(dataset);
        *self.account.last_refresh.write().await = Some(Utc::now());

        for sensor in &self.sensors {
            sensor.refresh().await;
        }
        tracing::info!(provider, records, "dataset refreshed");

        RefreshOutcome::Updated { records }
    }
}
