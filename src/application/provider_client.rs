// Client trait for utility scraper backends
use crate::domain::record::Dataset;
use async_trait::async_trait;
use thiserror::Error;

/// Errors a scraper client can produce during a fetch. Pollers log these and
/// keep the previous dataset; nothing retries before the next scheduled tick.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to launch scraper: {0}")]
    Launch(#[from] std::io::Error),

    #[error("scraper exited with {status}: {stderr}")]
    ScraperFailed { status: String, stderr: String },

    #[error("scraper did not finish within {0} seconds")]
    Timeout(u64),

    #[error("malformed scraper output: {0}")]
    MalformedOutput(String),
}

/// Stable capability interface over the per-provider scraper backends. The
/// concrete clients differ in construction (the water scraper grew a timeout
/// parameter at some point) but all reduce to one fetch returning the full
/// ordered dataset.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Short provider identifier used in logs and sensor attributes.
    fn provider_name(&self) -> &str;

    /// Field keys this client's records are known to carry. Sensor bindings
    /// are validated against this at setup so that a schema drift between
    /// scraper versions fails loudly instead of never populating a sensor.
    fn declared_fields(&self) -> &[&str];

    /// Run the scrape and return the complete dataset, oldest record first.
    async fn fetch(&self) -> Result<Dataset, FetchError>;
}
