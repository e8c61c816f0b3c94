//! Operator re-arm of alarmed sensors.
//!
//! Sensor cycles stop taking readings once their record is flagged
//! alarmed and never clear the flag themselves. [`rearm`] is the manual
//! step that clears it so monitoring resumes on the next cycle.

use serde::Serialize;
use thermo_core::reading::validate_sensor_name;
use thermo_db::store::SensorStore;

/// Outcome of clearing the alarm on one sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RearmResult {
    pub sensor_name: String,
    pub success: bool,
    pub message: String,
}

/// Clear the alarm flag on `name`.
///
/// Never fails outright: invalid names, unknown sensors and store errors
/// are all reported through [`RearmResult::success`].
pub async fn rearm<S: SensorStore>(store: &S, name: &str) -> RearmResult {
    if let Err(e) = validate_sensor_name(name) {
        return RearmResult {
            sensor_name: name.to_string(),
            success: false,
            message: e.to_string(),
        };
    }

    match store.set_alarmed(name, false).await {
        Ok(true) => {
            tracing::info!(sensor = %name, "Sensor alarm cleared");
            RearmResult {
                sensor_name: name.to_string(),
                success: true,
                message: format!("Sensor '{name}' re-armed"),
            }
        }
        Ok(false) => {
            tracing::warn!(sensor = %name, "No record for sensor -- nothing to re-arm");
            RearmResult {
                sensor_name: name.to_string(),
                success: false,
                message: format!("Sensor '{name}' has no stored record"),
            }
        }
        Err(e) => {
            tracing::error!(sensor = %name, error = %e, "Failed to clear sensor alarm");
            RearmResult {
                sensor_name: name.to_string(),
                success: false,
                message: format!("Failed to re-arm sensor '{name}': {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use thermo_core::reading::SensorReading;
    use thermo_db::models::sensor::CreateSensorRecord;
    use thermo_db::store::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn clears_alarmed_sensor() {
        let store = MemoryStore::new();
        store
            .insert(&CreateSensorRecord::from(&SensorReading::new("Cozinha", 40)))
            .await
            .unwrap();

        let result = rearm(&store, "Cozinha").await;

        assert!(result.success, "{}", result.message);
        let record = store.get("Cozinha").unwrap();
        assert!(!record.alarmed);
        assert_eq!(record.value, 40);
    }

    #[tokio::test]
    async fn unknown_sensor_is_reported() {
        let store = MemoryStore::new();
        let result = rearm(&store, "Garagem").await;
        assert!(!result.success);
        assert!(result.message.contains("no stored record"));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_without_touching_store() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let result = rearm(&store, "  ").await;
        assert!(!result.success);
        assert!(result.message.starts_with("Validation failed"));
    }

    #[tokio::test]
    async fn store_outage_is_reported() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let result = rearm(&store, "Sala").await;
        assert!(!result.success);
        assert!(result.message.contains("Store unavailable"));
    }
}
