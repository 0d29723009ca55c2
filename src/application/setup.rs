// Setup - Build accounts, sensors and pollers from configuration
use crate::application::poller::{Account, AccountPoller};
use crate::application::projection::SensorProjection;
use crate::domain::sensor::{ENERGY_KILO_WATT_HOUR, ICON_GAS, ICON_WATER, VOLUME_LITERS};
use crate::infrastructure::config::{ProviderSettings, ProvidersConfig};
use crate::infrastructure::scraper_client::{GrdfGasClient, VeoliaWaterClient};
use anyhow::{bail, Context};
use std::sync::Arc;

const ATTRIBUTION_GRDF: &str = "Data provided by GrDF";
const ATTRIBUTION_VEOLIA: &str = "Data provided by VeoliaIDF";

/// Everything main needs to run: one poller per configured provider plus a
/// flat registry of all sensors for the HTTP surface.
pub struct Platform {
    pub pollers: Vec<AccountPoller>,
    pub sensors: Vec<Arc<SensorProjection>>,
}

/// Wires clients, accounts and sensors from configuration. Any problem here
/// (no provider, bad interval, sensor bound to an undeclared field) aborts
/// startup before anything is scheduled.
pub fn build_platform(config: &ProvidersConfig) -> anyhow::Result<Platform> {
    let mut pollers = Vec::new();
    let mut sensors = Vec::new();

    if let Some(gas) = &config.gas {
        let account = gas_account(gas)?;
        let gas_sensors = vec![Arc::new(SensorProjection::new(
            "Gas yesterday",
            "daily_kWh",
            ENERGY_KILO_WATT_HOUR,
            ICON_GAS,
            account.clone(),
        ))];
        validate_field_bindings(&account, &gas_sensors)?;
        pollers.push(AccountPoller::new(account, gas_sensors.clone()));
        sensors.extend(gas_sensors);
    }

    if let Some(water) = &config.water {
        let account = water_account(water)?;
        let water_sensors = vec![
            Arc::new(SensorProjection::new(
                "Water yesterday liter",
                "daily_liter",
                VOLUME_LITERS,
                ICON_WATER,
                account.clone(),
            )),
            Arc::new(SensorProjection::new(
                "Water total liter",
                "total_liter",
                VOLUME_LITERS,
                ICON_WATER,
                account.clone(),
            )),
        ];
        validate_field_bindings(&account, &water_sensors)?;
        pollers.push(AccountPoller::new(account, water_sensors.clone()));
        sensors.extend(water_sensors);
    }

    if pollers.is_empty() {
        bail!("no provider configured: add a [gas] or [water] section");
    }

    Ok(Platform { pollers, sensors })
}

fn gas_account(settings: &ProviderSettings) -> anyhow::Result<Arc<Account>> {
    let client = Arc::new(GrdfGasClient::new(
        settings.username.clone(),
        settings.password.clone(),
        settings.webdriver.clone(),
        settings.tmpdir.clone(),
    ));
    Ok(Arc::new(Account::new(
        settings.username.clone(),
        ATTRIBUTION_GRDF.to_string(),
        client,
        settings.scan_interval().context("gas scan interval")?,
    )))
}

fn water_account(settings: &ProviderSettings) -> anyhow::Result<Arc<Account>> {
    let client = Arc::new(VeoliaWaterClient::new(
        settings.username.clone(),
        settings.password.clone(),
        settings.webdriver.clone(),
        settings.tmpdir.clone(),
        settings.fetch_timeout_secs,
    ));
    Ok(Arc::new(Account::new(
        settings.username.clone(),
        ATTRIBUTION_VEOLIA.to_string(),
        client,
        settings.scan_interval().context("water scan interval")?,
    )))
}

/// Every sensor must bind to a field the client declares. Scraper versions
/// have renamed record fields before; catching that here turns a silently
/// never-populating sensor into a startup error.
fn validate_field_bindings(
    account: &Account,
    sensors: &[Arc<SensorProjection>],
) -> anyhow::Result<()> {
    for sensor in sensors {
        if !account.declared_fields().contains(&sensor.field_key()) {
            bail!(
                "sensor '{}' is bound to field '{}' which the {} client does not declare \
                 (declared: {:?})",
                sensor.name(),
                sensor.field_key(),
                account.provider_name(),
                account.declared_fields(),
            );
        }
    }
    Ok(())
}
