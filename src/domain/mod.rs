// Domain layer - Consumption data and sensor models
pub mod record;
pub mod sensor;
