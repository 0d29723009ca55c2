// Shared fakes for application-layer tests
use crate::application::poller::Account;
use crate::application::provider_client::{FetchError, ProviderClient};
use crate::domain::record::{ConsumptionRecord, Dataset, FieldValue, FIELD_TIME};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

pub fn record(time: &str, key: &str, value: f64) -> ConsumptionRecord {
    let mut fields = HashMap::new();
    fields.insert(FIELD_TIME.to_string(), FieldValue::Text(time.to_string()));
    fields.insert(key.to_string(), FieldValue::Number(value));
    ConsumptionRecord::new(fields)
}

/// A scriptable stand-in for a scraper client. Each queued result is consumed
/// by one fetch call, in order.
pub struct FakeClient {
    results: tokio::sync::Mutex<VecDeque<Result<Dataset, FetchError>>>,
}

impl FakeClient {
    pub fn returning(result: Result<Dataset, FetchError>) -> Arc<Self> {
        Arc::new(Self {
            results: tokio::sync::Mutex::new(VecDeque::from([result])),
        })
    }

    pub async fn push(&self, result: Result<Dataset, FetchError>) {
        self.results.lock().await.push_back(result);
    }
}

#[async_trait]
impl ProviderClient for FakeClient {
    fn provider_name(&self) -> &str {
        "fake"
    }

    fn declared_fields(&self) -> &[&str] {
        &[FIELD_TIME, "daily_kWh"]
    }

    async fn fetch(&self) -> Result<Dataset, FetchError> {
        self.results
            .lock()
            .await
            .pop_front()
            .expect("more fetch calls than queued results")
    }
}

pub fn account_with(client: Arc<FakeClient>) -> Arc<Account> {
    Arc::new(Account::new(
        "user@example.com".to_string(),
        "Data provided by Fake".to_string(),
        client,
        Duration::from_secs(3600),
    ))
}
