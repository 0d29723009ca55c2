// Application state for HTTP handlers
use crate::application::projection::SensorProjection;
use std::sync::Arc;

pub struct AppState {
    pub sensors: Vec<Arc<SensorProjection>>,
}

impl AppState {
    pub fn sensor_by_name(&self, name: &str) -> Option<&Arc<SensorProjection>> {
        self.sensors.iter().find(|s| s.name() == name)
    }
}
