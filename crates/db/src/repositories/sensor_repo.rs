//! Repository for the `sensors` table.
//!
//! Every query runs on a caller-supplied connection so the store layer
//! decides how long a connection is held.

use sqlx::PgConnection;
use thermo_core::types::Celsius;

use crate::models::sensor::{CreateSensorRecord, SensorRecord};

/// Column list for `sensors` SELECT queries.
const COLUMNS: &str = "id, name, value, alarmed, unit, created_at, updated_at";

/// Provides query operations for sensor records.
pub struct SensorRepo;

impl SensorRepo {
    /// Find the record for a sensor by exact name.
    pub async fn find_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<SensorRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sensors WHERE name = $1");
        sqlx::query_as::<_, SensorRecord>(&query)
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    /// Insert a new record, returning the stored row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateSensorRecord,
    ) -> Result<SensorRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO sensors (name, value, alarmed, unit) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SensorRecord>(&query)
            .bind(&input.name)
            .bind(input.value)
            .bind(input.alarmed)
            .bind(&input.unit)
            .fetch_one(conn)
            .await
    }

    /// Overwrite `value` and `alarmed` on an existing record.
    ///
    /// Name and unit are left untouched. Returns the number of rows
    /// matched (0 or 1).
    pub async fn update_reading(
        conn: &mut PgConnection,
        name: &str,
        value: Celsius,
        alarmed: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sensors SET value = $2, alarmed = $3, updated_at = NOW() \
             WHERE name = $1",
        )
        .bind(name)
        .bind(value)
        .bind(alarmed)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Set or clear the alarm flag without touching the value.
    pub async fn set_alarmed(
        conn: &mut PgConnection,
        name: &str,
        alarmed: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sensors SET alarmed = $2, updated_at = NOW() WHERE name = $1",
        )
        .bind(name)
        .bind(alarmed)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
