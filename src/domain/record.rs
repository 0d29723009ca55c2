// Consumption record domain models
use serde::Serialize;
use std::collections::HashMap;

pub const FIELD_TIME: &str = "time";
pub const FIELD_TYPE: &str = "type";

/// A single value inside a consumption record - the scrapers emit a mix of
/// numeric readings and string metadata (dates, record type).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => Some(s.as_str()),
        }
    }
}

/// One dated reading as returned by a scraper: field name -> value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConsumptionRecord {
    pub fields: HashMap<String, FieldValue>,
}

impl ConsumptionRecord {
    pub fn new(fields: HashMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// The record's date string, when the scraper provided one.
    pub fn time(&self) -> Option<&str> {
        self.field(FIELD_TIME).and_then(FieldValue::as_text)
    }

    /// The record type (e.g. measured vs. estimated), when present.
    pub fn record_type(&self) -> Option<&str> {
        self.field(FIELD_TYPE).and_then(FieldValue::as_text)
    }
}

/// Chronologically ordered records for one account. The current reading is
/// always the last record; the whole dataset is replaced on each refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dataset {
    records: Vec<ConsumptionRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ConsumptionRecord>) -> Self {
        Self { records }
    }

    pub fn current(&self) -> Option<&ConsumptionRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time: &str, kwh: f64) -> ConsumptionRecord {
        let mut fields = HashMap::new();
        fields.insert(FIELD_TIME.to_string(), FieldValue::Text(time.to_string()));
        fields.insert("daily_kWh".to_string(), FieldValue::Number(kwh));
        ConsumptionRecord::new(fields)
    }

    #[test]
    fn test_current_is_last_record() {
        let dataset = Dataset::new(vec![record("2021-01-01", 12.3), record("2021-01-02", 15.0)]);

        let current = dataset.current().unwrap();
        assert_eq!(current.time(), Some("2021-01-02"));
        assert_eq!(current.field("daily_kWh").unwrap().as_number(), Some(15.0));
    }

    #[test]
    fn test_empty_dataset_has_no_current() {
        assert!(Dataset::default().current().is_none());
    }

    #[test]
    fn test_missing_field_lookup() {
        let dataset = Dataset::new(vec![record("2021-01-02", 15.0)]);
        assert!(dataset.current().unwrap().field("daily_liter").is_none());
    }
}
