// Sensor projection - One named field of an account's current record
use crate::application::poller::Account;
use crate::domain::sensor::SensorReading;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const ATTR_ATTRIBUTION: &str = "attribution";
pub const ATTR_USERNAME: &str = "username";
pub const ATTR_TIME: &str = "time";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_LAST_REFRESH: &str = "last_refresh";

/// Read-only view over one field of the account's freshest record. Starts
/// unset and holds the last successfully projected reading forever after;
/// a failed lookup never clears it.
pub struct SensorProjection {
    name: String,
    field_key: String,
    unit: &'static str,
    icon: &'static str,
    account: Arc<Account>,
    reading: RwLock<Option<SensorReading>>,
}

impl SensorProjection {
    pub fn new(
        name: impl Into<String>,
        field_key: impl Into<String>,
        unit: &'static str,
        icon: &'static str,
        account: Arc<Account>,
    ) -> Self {
        Self {
            name: name.into(),
            field_key: field_key.into(),
            unit,
            icon,
            account,
            reading: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_key(&self) -> &str {
        &self.field_key
    }

    pub fn unit(&self) -> &str {
        self.unit
    }

    pub fn icon(&self) -> &str {
        self.icon
    }

    /// Re-project from the account's current record. No data yet or a record
    /// without our field leaves the previous reading untouched.
    pub async fn refresh(&self) {
        let Some(dataset) = self.account.current_dataset().await else {
            tracing::debug!(sensor = %self.name, "no data available yet for update");
            return;
        };
        let Some(record) = dataset.current() else {
            tracing::debug!(sensor = %self.name, "dataset is empty, nothing to project");
            return;
        };

        match record.field(&self.field_key) {
            Some(value) => {
                let reading = SensorReading::new(
                    value.clone(),
                    record.time().map(str::to_string),
                    record.record_type().map(str::to_string),
                );
                *self.reading.write().await = Some(reading);
                tracing::debug!(sensor = %self.name, "reading updated");
            }
            None => {
                tracing::warn!(
                    sensor = %self.name,
                    field = %self.field_key,
                    "field missing from current record, keeping previous reading"
                );
            }
        }
    }

    /// The last observed reading, or `None` while uninitialized.
    pub async fn current_reading(&self) -> Option<SensorReading> {
        self.reading.read().await.clone()
    }

    /// Attribution, record metadata and account identity, for display and
    /// debugging alongside the state value.
    pub async fn attributes(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert(
            ATTR_ATTRIBUTION.to_string(),
            json!(self.account.attribution()),
        );
        attrs.insert(ATTR_USERNAME.to_string(), json!(self.account.username()));
        if let Some(reading) = self.reading.read().await.as_ref() {
            if let Some(time) = &reading.time {
                attrs.insert(ATTR_TIME.to_string(), json!(time));
            }
            if let Some(record_type) = &reading.record_type {
                attrs.insert(ATTR_TYPE.to_string(), json!(record_type));
            }
        }
        if let Some(refreshed_at) = self.account.last_refresh().await {
            attrs.insert(
                ATTR_LAST_REFRESH.to_string(),
                json!(refreshed_at.to_rfc3339()),
            );
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::poller::AccountPoller;
    use crate::application::test_support::{account_with, record, FakeClient};
    use crate::domain::record::{Dataset, FieldValue};
    use crate::domain::sensor::{ENERGY_KILO_WATT_HOUR, ICON_GAS};

    fn sensor(field_key: &str, account: Arc<Account>) -> Arc<SensorProjection> {
        Arc::new(SensorProjection::new(
            "Gas yesterday",
            field_key,
            ENERGY_KILO_WATT_HOUR,
            ICON_GAS,
            account,
        ))
    }

    #[tokio::test]
    async fn test_unset_before_any_data() {
        let account = account_with(FakeClient::returning(Ok(Dataset::default())));
        let sensor = sensor("daily_kWh", account);

        sensor.refresh().await;

        assert_eq!(sensor.current_reading().await, None);
        let attrs = sensor.attributes().await;
        assert_eq!(attrs[ATTR_ATTRIBUTION], json!("Data provided by Fake"));
        assert_eq!(attrs[ATTR_USERNAME], json!("user@example.com"));
        assert!(!attrs.contains_key(ATTR_TIME));
    }

    #[tokio::test]
    async fn test_projects_current_record_after_refresh() {
        let dataset = Dataset::new(vec![
            record("2021-01-01", "daily_kWh", 12.3),
            record("2021-01-02", "daily_kWh", 15.0),
        ]);
        let account = account_with(FakeClient::returning(Ok(dataset)));
        let sensor = sensor("daily_kWh", account.clone());
        let poller = AccountPoller::new(account, vec![sensor.clone()]);

        poller.refresh().await;

        let reading = sensor.current_reading().await.unwrap();
        assert_eq!(reading.value, FieldValue::Number(15.0));
        assert_eq!(reading.time.as_deref(), Some("2021-01-02"));
        let attrs = sensor.attributes().await;
        assert_eq!(attrs[ATTR_TIME], json!("2021-01-02"));
        assert!(attrs.contains_key(ATTR_LAST_REFRESH));
    }

    #[tokio::test]
    async fn test_missing_field_keeps_previous_reading() {
        let dataset = Dataset::new(vec![record("2021-01-02", "daily_kWh", 15.0)]);
        let client = FakeClient::returning(Ok(dataset));
        let account = account_with(client.clone());
        let sensor = sensor("daily_kWh", account.clone());
        let poller = AccountPoller::new(account.clone(), vec![sensor.clone()]);
        poller.refresh().await;

        // Next scrape drops the field (schema drift between scraper versions).
        let drifted = Dataset::new(vec![record("2021-01-03", "daily_m3", 1.4)]);
        client.push(Ok(drifted)).await;
        poller.refresh().await;

        let reading = sensor.current_reading().await.unwrap();
        assert_eq!(reading.value, FieldValue::Number(15.0));
        assert_eq!(reading.time.as_deref(), Some("2021-01-02"));
    }

    #[tokio::test]
    async fn test_failed_fetch_changes_no_sensor_value() {
        use crate::application::provider_client::FetchError;

        let client = FakeClient::returning(Err(FetchError::Timeout(120)));
        let account = account_with(client);
        let sensor = sensor("daily_kWh", account.clone());
        let poller = AccountPoller::new(account, vec![sensor.clone()]);

        poller.refresh().await;

        assert_eq!(sensor.current_reading().await, None);
    }
}
