use std::str::FromStr;
use std::time::Duration;

use thermo_core::error::CoreError;
use thermo_core::reading::validate_sensor_name;

use crate::cycle::CycleTiming;

/// Sensors monitored when `SENSOR_NAMES` is not set.
pub const DEFAULT_SENSOR_NAMES: [&str; 4] = ["Quintal", "Quarto", "Sala", "Cozinha"];

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TICK_MILLIS: u64 = 1000;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Monitor configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local run. Without a
/// `DATABASE_URL` the monitor keeps readings in memory.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Sensor names, one cycle each, in configured order without duplicates.
    pub sensor_names: Vec<String>,
    /// Postgres URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Connection pool size (default: `5`).
    pub db_max_connections: u32,
    /// Length of one cycle time unit (default: 1 s).
    pub tick: Duration,
    /// How long shutdown waits for cycles to stop (default: 5 s).
    pub shutdown_timeout: Duration,
}

impl MonitorConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                       |
    /// |-------------------------|-------------------------------|
    /// | `SENSOR_NAMES`          | `Quintal,Quarto,Sala,Cozinha` |
    /// | `DATABASE_URL`          | unset (in-memory store)       |
    /// | `DB_MAX_CONNECTIONS`    | `5`                           |
    /// | `CYCLE_TICK_MILLIS`     | `1000`                        |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `5`                           |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sensor_names = match lookup("SENSOR_NAMES") {
            Some(raw) => parse_sensor_names(&raw)?,
            None => DEFAULT_SENSOR_NAMES.iter().map(|s| s.to_string()).collect(),
        };

        let database_url = lookup("DATABASE_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let db_max_connections: u32 =
            parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(CoreError::Configuration(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        let tick_millis: u64 = parse_or(&lookup, "CYCLE_TICK_MILLIS", DEFAULT_TICK_MILLIS)?;
        if tick_millis == 0 {
            return Err(CoreError::Configuration(
                "CYCLE_TICK_MILLIS must be at least 1".to_string(),
            ));
        }

        let shutdown_timeout_secs: u64 = parse_or(
            &lookup,
            "SHUTDOWN_TIMEOUT_SECS",
            DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        )?;

        Ok(Self {
            sensor_names,
            database_url,
            db_max_connections,
            tick: Duration::from_millis(tick_millis),
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
        })
    }

    /// Cycle timing derived from the configured tick.
    pub fn timing(&self) -> CycleTiming {
        CycleTiming::new(self.tick)
    }
}

/// Split a comma-separated list into validated, de-duplicated names.
pub fn parse_sensor_names(raw: &str) -> Result<Vec<String>, CoreError> {
    let mut names: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        validate_sensor_name(name)?;
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    if names.is_empty() {
        return Err(CoreError::Configuration(
            "SENSOR_NAMES must list at least one sensor".to_string(),
        ));
    }
    Ok(names)
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CoreError::Configuration(format!("{key} is invalid ('{raw}'): {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<MonitorConfig, CoreError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MonitorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.sensor_names, DEFAULT_SENSOR_NAMES);
        assert!(config.database_url.is_none());
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.tick, Duration::from_secs(1));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("SENSOR_NAMES", "Garagem, Sotao"),
            ("DATABASE_URL", "postgres://localhost/thermo"),
            ("DB_MAX_CONNECTIONS", "2"),
            ("CYCLE_TICK_MILLIS", "250"),
            ("SHUTDOWN_TIMEOUT_SECS", "1"),
        ])
        .unwrap();

        assert_eq!(config.sensor_names, vec!["Garagem", "Sotao"]);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/thermo")
        );
        assert_eq!(config.db_max_connections, 2);
        assert_eq!(config.tick, Duration::from_millis(250));
        assert_eq!(config.timing().unit, Duration::from_millis(250));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = load(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn duplicate_sensor_names_collapse() {
        let names = parse_sensor_names("Sala,Quarto, Sala ,,Quarto").unwrap();
        assert_eq!(names, vec!["Sala", "Quarto"]);
    }

    #[test]
    fn empty_sensor_list_is_rejected() {
        assert_matches!(load(&[("SENSOR_NAMES", " , ")]), Err(CoreError::Configuration(_)));
    }

    #[test]
    fn overlong_sensor_name_is_rejected() {
        let long = "x".repeat(100);
        assert_matches!(
            load(&[("SENSOR_NAMES", long.as_str())]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn non_numeric_tick_is_rejected() {
        let err = load(&[("CYCLE_TICK_MILLIS", "fast")]).unwrap_err();
        assert!(err.to_string().contains("CYCLE_TICK_MILLIS"));
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert_matches!(
            load(&[("CYCLE_TICK_MILLIS", "0")]),
            Err(CoreError::Configuration(_))
        );
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        assert_matches!(
            load(&[("DB_MAX_CONNECTIONS", "0")]),
            Err(CoreError::Configuration(_))
        );
    }
}
