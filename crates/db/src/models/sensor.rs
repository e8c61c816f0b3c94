//! Sensor record entity and insert DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thermo_core::reading::{SensorReading, UNIT_CELSIUS};
use thermo_core::types::{Celsius, DbId, Timestamp};

/// Latest known state of one sensor. One row per sensor name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SensorRecord {
    pub id: DbId,
    pub name: String,
    pub value: Celsius,
    /// Set when the last written value crossed the alarm threshold.
    /// An operator may also set or clear it directly.
    pub alarmed: bool,
    pub unit: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new sensor record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CreateSensorRecord {
    pub name: String,
    pub value: Celsius,
    pub alarmed: bool,
    pub unit: String,
}

impl From<&SensorReading> for CreateSensorRecord {
    fn from(reading: &SensorReading) -> Self {
        Self {
            name: reading.name.clone(),
            value: reading.value,
            alarmed: reading.alarmed(),
            unit: UNIT_CELSIUS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_record_from_cool_reading() {
        let record = CreateSensorRecord::from(&SensorReading::new("Sala", 35));
        assert_eq!(
            record,
            CreateSensorRecord {
                name: "Sala".to_string(),
                value: 35,
                alarmed: false,
                unit: "ºC".to_string(),
            }
        );
    }

    #[test]
    fn create_record_from_hot_reading_is_alarmed() {
        let record = CreateSensorRecord::from(&SensorReading::new("Quintal", 40));
        assert!(record.alarmed);
        assert_eq!(record.unit, UNIT_CELSIUS);
    }

    #[test]
    fn sensor_record_serialization_includes_all_fields() {
        let now = chrono::Utc::now();
        let record = SensorRecord {
            id: 7,
            name: "Cozinha".to_string(),
            value: 39,
            alarmed: true,
            unit: UNIT_CELSIUS.to_string(),
            created_at: now,
            updated_at: now,
        };

        let parsed = serde_json::to_value(&record).expect("serialization should succeed");
        assert_eq!(parsed["id"], 7);
        assert_eq!(parsed["name"], "Cozinha");
        assert_eq!(parsed["value"], 39);
        assert_eq!(parsed["alarmed"], true);
        assert_eq!(parsed["unit"], "ºC");
        assert!(parsed["updated_at"].is_string());
    }
}
