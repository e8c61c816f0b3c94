//! Store gateway for sensor records.
//!
//! [`SensorStore`] is the only surface the sensor cycles use. Each call is
//! independent: implementations acquire whatever connection they need for
//! that one operation and release it before returning. Failures are handed
//! back as [`StoreError`]; what to do about them is the caller's decision.

mod memory;
mod postgres;

use std::future::Future;

use thermo_core::types::Celsius;

use crate::models::sensor::{CreateSensorRecord, SensorRecord};

pub use memory::MemoryStore;
pub use postgres::PgSensorStore;

/// Errors raised by a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("No sensor record named '{name}'")]
    NotFound { name: String },

    #[error("A sensor record named '{name}' already exists")]
    Duplicate { name: String },
}

/// Find, insert and update operations over the sensor collection.
pub trait SensorStore: Send + Sync {
    /// Look up the record for `name`, if one exists.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<SensorRecord>, StoreError>> + Send;

    /// Insert a full record for a sensor that has none yet.
    fn insert(
        &self,
        record: &CreateSensorRecord,
    ) -> impl Future<Output = Result<SensorRecord, StoreError>> + Send;

    /// Update `value` and `alarmed` on the record for `name`.
    ///
    /// Resolves to `false` when no record matched.
    fn update_reading(
        &self,
        name: &str,
        value: Celsius,
        alarmed: bool,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Set or clear the alarm flag on the record for `name`.
    ///
    /// Sensor cycles never call this; it is the operator's way to re-arm
    /// an alarmed sensor. Resolves to `false` when no record matched.
    fn set_alarmed(
        &self,
        name: &str,
        alarmed: bool,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
