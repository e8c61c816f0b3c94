//! Per-sensor polling loop.
//!
//! Each [`SensorCycle`] repeats the same iteration until cancelled:
//!
//! 1. Look up the sensor's record. If it is flagged `alarmed`, log an alarm
//!    and skip the reading.
//! 2. Otherwise wait a random 1-3 time units (sensor latency), take a
//!    reading, and upsert it: update `value`/`alarmed` when a record exists,
//!    insert a full record when it does not.
//! 3. Wait a fixed 2 time units.
//!
//! An alarmed sensor stays silent until someone clears the flag in the
//! store; the cycle never clears it.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thermo_core::reading::SensorReading;
use thermo_db::models::sensor::CreateSensorRecord;
use thermo_db::store::{SensorStore, StoreError};
use tokio_util::sync::CancellationToken;

use crate::generator::TemperatureSource;

/// Default length of one time unit.
const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Fixed pause between iterations, in time units.
pub const SETTLE_UNITS: u32 = 2;

/// Simulated sensor latency before each reading, in time units.
pub const LATENCY_UNITS: RangeInclusive<u32> = 1..=3;

/// Converts the cycle's abstract time units into wall-clock durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTiming {
    pub unit: Duration,
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

impl CycleTiming {
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }

    /// Pause between iterations.
    pub fn settle_delay(&self) -> Duration {
        self.unit * SETTLE_UNITS
    }

    /// A fresh random sensor latency.
    pub fn latency_delay(&self) -> Duration {
        let units = rand::rng().random_range(LATENCY_UNITS);
        self.unit * units
    }
}

/// What one iteration of a cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The record was flagged alarmed; no reading was taken.
    Alarmed,
    /// First reading for this sensor; a record was created.
    Inserted,
    /// The existing record's value and alarm flag were overwritten.
    Updated,
    /// A reading was taken but could not be stored.
    WriteFailed,
    /// Cancellation arrived while waiting for the reading.
    Cancelled,
}

/// Result of a successful [`upsert_reading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Store a reading: update the existing record for its sensor or insert a
/// new one.
///
/// The alarm flag is always recomputed from the value. A failed existence
/// lookup aborts the write rather than guessing which branch to take.
pub async fn upsert_reading<S: SensorStore>(
    store: &S,
    reading: &SensorReading,
) -> Result<UpsertOutcome, StoreError> {
    let record = CreateSensorRecord::from(reading);

    match store.find_by_name(&record.name).await? {
        Some(_) => {
            let matched = store
                .update_reading(&record.name, record.value, record.alarmed)
                .await?;
            if !matched {
                return Err(StoreError::NotFound { name: record.name });
            }
            Ok(UpsertOutcome::Updated)
        }
        None => {
            store.insert(&record).await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

/// Sleep for `delay` unless `cancel` fires first.
///
/// Returns `false` when cancelled.
pub async fn sleep_or_cancel(cancel: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

/// The polling loop for one named sensor.
pub struct SensorCycle<S, T> {
    name: String,
    store: Arc<S>,
    source: Arc<T>,
    timing: CycleTiming,
}

impl<S, T> SensorCycle<S, T>
where
    S: SensorStore,
    T: TemperatureSource,
{
    pub fn new(name: impl Into<String>, store: Arc<S>, source: Arc<T>, timing: CycleTiming) -> Self {
        Self {
            name: name.into(),
            store,
            source,
            timing,
        }
    }

    /// Run iterations until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(sensor = %self.name, "Sensor cycle started");

        loop {
            if self.step(&cancel).await == StepOutcome::Cancelled {
                break;
            }
            if !sleep_or_cancel(&cancel, self.timing.settle_delay()).await {
                break;
            }
        }

        tracing::info!(sensor = %self.name, "Sensor cycle stopped");
    }

    /// One iteration without the trailing settle delay.
    pub async fn step(&self, cancel: &CancellationToken) -> StepOutcome {
        if self.alarm_triggered().await {
            tracing::warn!(
                sensor = %self.name,
                "Temperature too high! Check sensor {}!",
                self.name,
            );
            return StepOutcome::Alarmed;
        }

        if !sleep_or_cancel(cancel, self.timing.latency_delay()).await {
            return StepOutcome::Cancelled;
        }

        self.read_and_store().await
    }

    /// Whether the stored record is flagged alarmed.
    ///
    /// A missing record or a failed lookup both count as not alarmed, so an
    /// outage never silences a sensor.
    async fn alarm_triggered(&self) -> bool {
        match self.store.find_by_name(&self.name).await {
            Ok(Some(record)) => record.alarmed,
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(
                    sensor = %self.name,
                    error = %e,
                    "Alarm check failed -- treating sensor as not alarmed",
                );
                false
            }
        }
    }

    async fn read_and_store(&self) -> StepOutcome {
        tracing::info!(sensor = %self.name, "Processing sensor");

        let reading = SensorReading::new(self.name.clone(), self.source.sample());

        match upsert_reading(self.store.as_ref(), &reading).await {
            Ok(UpsertOutcome::Inserted) => {
                tracing::info!(
                    sensor = %reading.name,
                    value = reading.value,
                    alarmed = reading.alarmed(),
                    "Sensor record created",
                );
                StepOutcome::Inserted
            }
            Ok(UpsertOutcome::Updated) => {
                tracing::info!(
                    sensor = %reading.name,
                    value = reading.value,
                    alarmed = reading.alarmed(),
                    "Sensor record updated",
                );
                StepOutcome::Updated
            }
            Err(e) => {
                tracing::error!(
                    sensor = %reading.name,
                    value = reading.value,
                    error = %e,
                    "Failed to store sensor reading",
                );
                StepOutcome::WriteFailed
            }
        }
    }
}
