//! Sensor reading payloads and the alarm rule.
//!
//! A reading is the `{name, value}` pair produced by one sensor cycle.
//! Whether it is alarming is always derived from `value`, never supplied
//! by the caller.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Celsius;

/// Readings strictly above this temperature mark the sensor as alarmed.
pub const ALARM_THRESHOLD_CELSIUS: Celsius = 38;

/// Unit label stored alongside every sensor record.
pub const UNIT_CELSIUS: &str = "ºC";

/// Lowest temperature the simulated sensors can report.
pub const MIN_READING_CELSIUS: Celsius = 30;

/// Highest temperature the simulated sensors can report.
pub const MAX_READING_CELSIUS: Celsius = 40;

/// Maximum accepted length for a sensor name.
pub const MAX_SENSOR_NAME_LEN: usize = 64;

/// Whether a temperature trips the alarm.
pub fn is_alarming(value: Celsius) -> bool {
    value > ALARM_THRESHOLD_CELSIUS
}

/// Validate a configured sensor name.
///
/// Names must be non-blank and at most [`MAX_SENSOR_NAME_LEN`] characters.
pub fn validate_sensor_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "sensor name must not be blank".to_string(),
        ));
    }
    if name.chars().count() > MAX_SENSOR_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "sensor name '{name}' exceeds {MAX_SENSOR_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// One observation taken from a named sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    pub name: String,
    pub value: Celsius,
}

impl SensorReading {
    pub fn new(name: impl Into<String>, value: Celsius) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Alarm state implied by this reading's value.
    pub fn alarmed(&self) -> bool {
        is_alarming(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        assert!(!is_alarming(37));
        assert!(!is_alarming(ALARM_THRESHOLD_CELSIUS));
        assert!(is_alarming(39));
        assert!(is_alarming(MAX_READING_CELSIUS));
    }

    #[test]
    fn reading_derives_alarm_from_value() {
        assert!(!SensorReading::new("Sala", 35).alarmed());
        assert!(SensorReading::new("Sala", 39).alarmed());
    }

    #[test]
    fn reading_serializes_name_and_value() {
        let json = serde_json::to_value(SensorReading::new("Quarto", 31)).unwrap();
        assert_eq!(json["name"], "Quarto");
        assert_eq!(json["value"], 31);
    }

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate_sensor_name("Cozinha").is_ok());
        assert!(validate_sensor_name("Sala de estar").is_ok());
    }

    #[test]
    fn rejects_blank_names() {
        assert!(validate_sensor_name("").is_err());
        assert!(validate_sensor_name("   ").is_err());
    }

    #[test]
    fn rejects_overlong_names() {
        let name = "x".repeat(MAX_SENSOR_NAME_LEN + 1);
        assert!(validate_sensor_name(&name).is_err());
    }
}
