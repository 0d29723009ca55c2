// Sensor reading domain model
use super::record::FieldValue;
use serde::Serialize;

pub const ENERGY_KILO_WATT_HOUR: &str = "kWh";
pub const VOLUME_LITERS: &str = "L";

pub const ICON_GAS: &str = "mdi:fire";
pub const ICON_WATER: &str = "mdi:water";

/// The last value a sensor observed, together with the time/type metadata of
/// the record it was projected from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub value: FieldValue,
    pub time: Option<String>,
    pub record_type: Option<String>,
}

impl SensorReading {
    pub fn new(value: FieldValue, time: Option<String>, record_type: Option<String>) -> Self {
        Self {
            value,
            time,
            record_type,
        }
    }
}
