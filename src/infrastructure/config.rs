use anyhow::bail;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_SCAN_INTERVAL_MINUTES: u64 = 240; // 4 hours
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    pub gas: Option<ProviderSettings>,
    pub water: Option<ProviderSettings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
    pub username: String,
    pub password: String,
    /// Path or selector of the browser-automation backend the scraper drives.
    pub webdriver: String,
    /// Scratch directory for the scraper's session files.
    pub tmpdir: String,
    #[serde(default = "default_scan_interval_minutes")]
    pub scan_interval_minutes: u64,
    /// Only honored by clients whose scraper takes a timeout (water).
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl ProviderSettings {
    pub fn scan_interval(&self) -> anyhow::Result<Duration> {
        if self.scan_interval_minutes == 0 {
            bail!("scan_interval_minutes must be positive");
        }
        Ok(Duration::from_secs(self.scan_interval_minutes * 60))
    }
}

fn default_scan_interval_minutes() -> u64 {
    DEFAULT_SCAN_INTERVAL_MINUTES
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

pub fn load_providers_config() -> anyhow::Result<ProvidersConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/providers"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
