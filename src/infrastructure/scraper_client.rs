// Scraper-backed provider clients
use crate::application::provider_client::{FetchError, ProviderClient};
use crate::domain::record::{ConsumptionRecord, Dataset, FieldValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::process::Command;

const GAS_SCRAPER: &str = "pygazpar";
const WATER_SCRAPER: &str = "pyveoliaidf";

/// Record fields the gas scraper currently emits. The list has shifted across
/// scraper releases, which is exactly why sensor bindings are validated
/// against it at startup.
const GAS_FIELDS: &[&str] = &[
    "time",
    "daily_kWh",
    "daily_mcube",
    "index_mcube",
    "converter_factor",
    "temperature_degC",
    "type",
];

const WATER_FIELDS: &[&str] = &["time", "daily_liter", "total_liter", "type"];

/// Gas meter readings scraped from the GrDF portal. The scraper is an
/// external executable that drives a headless browser and prints the full
/// record history as a JSON array on stdout.
pub struct GrdfGasClient {
    username: String,
    password: String,
    webdriver: String,
    tmpdir: String,
}

impl GrdfGasClient {
    pub fn new(username: String, password: String, webdriver: String, tmpdir: String) -> Self {
        Self {
            username,
            password,
            webdriver,
            tmpdir,
        }
    }
}

#[async_trait]
impl ProviderClient for GrdfGasClient {
    fn provider_name(&self) -> &str {
        "grdf"
    }

    fn declared_fields(&self) -> &[&str] {
        GAS_FIELDS
    }

    async fn fetch(&self) -> Result<Dataset, FetchError> {
        let output = Command::new(GAS_SCRAPER)
            .arg("-u")
            .arg(&self.username)
            .arg("-p")
            .arg(&self.password)
            .arg("-w")
            .arg(&self.webdriver)
            .arg("-t")
            .arg(&self.tmpdir)
            .output()
            .await?;
        dataset_from_output(output)
    }
}

/// Water meter readings scraped from the Veolia portal. Same contract as the
/// gas client, except this scraper revision takes an explicit timeout.
pub struct VeoliaWaterClient {
    program: String,
    username: String,
    password: String,
    webdriver: String,
    tmpdir: String,
    timeout_secs: u64,
}

impl VeoliaWaterClient {
    pub fn new(
        username: String,
        password: String,
        webdriver: String,
        tmpdir: String,
        timeout_secs: u64,
    ) -> Self {
        Self {
            program: WATER_SCRAPER.to_string(),
            username,
            password,
            webdriver,
            tmpdir,
            timeout_secs,
        }
    }

    #[cfg(test)]
    fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl ProviderClient for VeoliaWaterClient {
    fn provider_name(&self) -> &str {
        "veolia"
    }

    fn declared_fields(&self) -> &[&str] {
        WATER_FIELDS
    }

    async fn fetch(&self) -> Result<Dataset, FetchError> {
        // kill_on_drop: a timed-out scrape must not leave an orphaned browser
        // session holding the webdriver/tmpdir when the next tick fires
        let run = Command::new(&self.program)
            .arg("-u")
            .arg(&self.username)
            .arg("-p")
            .arg(&self.password)
            .arg("-w")
            .arg(&self.webdriver)
            .arg("-t")
            .arg(&self.tmpdir)
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(Duration::from_secs(self.timeout_secs), run)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout_secs))??;
        dataset_from_output(output)
    }
}

fn dataset_from_output(output: std::process::Output) -> Result<Dataset, FetchError> {
    if !output.status.success() {
        return Err(FetchError::ScraperFailed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    parse_records(&output.stdout)
}

/// Decodes the scraper's stdout: a JSON array of flat records, oldest first.
/// Numbers and strings become field values; anything else is dropped.
fn parse_records(stdout: &[u8]) -> Result<Dataset, FetchError> {
    let json: serde_json::Value = serde_json::from_slice(stdout)
        .map_err(|e| FetchError::MalformedOutput(e.to_string()))?;
    let serde_json::Value::Array(entries) = json else {
        return Err(FetchError::MalformedOutput(
            "expected a JSON array of records".to_string(),
        ));
    };

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let serde_json::Value::Object(object) = entry else {
            return Err(FetchError::MalformedOutput(
                "expected each record to be a JSON object".to_string(),
            ));
        };
        let mut fields = HashMap::new();
        for (key, value) in object {
            match value {
                serde_json::Value::Number(n) => {
                    if let Some(n) = n.as_f64() {
                        fields.insert(key, FieldValue::Number(n));
                    }
                }
                serde_json::Value::String(s) => {
                    fields.insert(key, FieldValue::Text(s));
                }
                other => {
                    tracing::debug!(field = %key, value = %other, "skipping non-scalar field");
                }
            }
        }
        records.push(ConsumptionRecord::new(fields));
    }

    Ok(Dataset::new(records))
}
