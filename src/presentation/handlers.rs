// HTTP request handlers
use crate::application::projection::SensorProjection;
use crate::domain::record::FieldValue;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// How one sensor entity is rendered for the home-automation platform.
#[derive(Serialize)]
pub struct SensorView {
    pub name: String,
    pub state: Option<FieldValue>,
    pub unit: String,
    pub icon: String,
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

async fn render(sensor: &SensorProjection) -> SensorView {
    let reading = sensor.current_reading().await;
    SensorView {
        name: sensor.name().to_string(),
        state: reading.map(|r| r.value),
        unit: sensor.unit().to_string(),
        icon: sensor.icon().to_string(),
        attributes: sensor.attributes().await,
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List every registered sensor with its current state
pub async fn list_sensors(State(state): State<Arc<AppState>>) -> Json<Vec<SensorView>> {
    let mut views = Vec::with_capacity(state.sensors.len());
    for sensor in &state.sensors {
        views.push(render(sensor).await);
    }
    Json(views)
}

/// One sensor by display name
pub async fn get_sensor(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SensorView>, StatusCode> {
    match state.sensor_by_name(&name) {
        Some(sensor) => Ok(Json(render(sensor).await)),
        None => Err(StatusCode::NOT_FOUND),
    }
}
