//! Postgres-backed [`SensorStore`].

use thermo_core::types::Celsius;

use super::{SensorStore, StoreError};
use crate::models::sensor::{CreateSensorRecord, SensorRecord};
use crate::repositories::SensorRepo;
use crate::DbPool;

/// Runs each store operation on its own pooled connection.
///
/// The connection is acquired at the start of the call and returned to the
/// pool when it drops at the end; nothing is held between operations.
#[derive(Debug, Clone)]
pub struct PgSensorStore {
    pool: DbPool,
}

impl PgSensorStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl SensorStore for PgSensorStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<SensorRecord>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(SensorRepo::find_by_name(&mut conn, name).await?)
    }

    async fn insert(&self, record: &CreateSensorRecord) -> Result<SensorRecord, StoreError> {
        let mut conn = self.pool.acquire().await?;
        SensorRepo::create(&mut conn, record)
            .await
            .map_err(|e| {
                let duplicate = e
                    .as_database_error()
                    .is_some_and(|db_err| db_err.is_unique_violation());
                if duplicate {
                    tracing::warn!(sensor = %record.name, "Insert rejected: sensor record already exists");
                    StoreError::Duplicate {
                        name: record.name.clone(),
                    }
                } else {
                    StoreError::Database(e)
                }
            })
    }

    async fn update_reading(
        &self,
        name: &str,
        value: Celsius,
        alarmed: bool,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = SensorRepo::update_reading(&mut conn, name, value, alarmed).await?;
        Ok(rows > 0)
    }

    async fn set_alarmed(&self, name: &str, alarmed: bool) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = SensorRepo::set_alarmed(&mut conn, name, alarmed).await?;
        Ok(rows > 0)
    }
}
