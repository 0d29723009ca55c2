// Presentation layer - Read-only HTTP surface over the sensors
pub mod app_state;
pub mod handlers;
