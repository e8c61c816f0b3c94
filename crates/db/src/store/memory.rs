//! In-process [`SensorStore`] keyed by sensor name.
//!
//! Used when no database is configured and by the monitor's tests. The
//! store can be switched offline to simulate an outage: every operation
//! then fails with [`StoreError::Unavailable`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use thermo_core::types::Celsius;

use super::{SensorStore, StoreError};
use crate::models::sensor::{CreateSensorRecord, SensorRecord};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, SensorRecord>>,
    next_id: AtomicI64,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate (or end) a store outage.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of the record for `name`, bypassing the outage switch.
    pub fn get(&self, name: &str) -> Option<SensorRecord> {
        self.lock().get(name).cloned()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SensorRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl SensorStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<SensorRecord>, StoreError> {
        self.ensure_online()?;
        Ok(self.get(name))
    }

    async fn insert(&self, record: &CreateSensorRecord) -> Result<SensorRecord, StoreError> {
        self.ensure_online()?;
        let mut records = self.lock();
        if records.contains_key(&record.name) {
            return Err(StoreError::Duplicate {
                name: record.name.clone(),
            });
        }

        let now = Utc::now();
        let stored = SensorRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: record.name.clone(),
            value: record.value,
            alarmed: record.alarmed,
            unit: record.unit.clone(),
            created_at: now,
            updated_at: now,
        };
        records.insert(stored.name.clone(), stored.clone());
        Ok(stored)
    }

    async fn update_reading(
        &self,
        name: &str,
        value: Celsius,
        alarmed: bool,
    ) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let mut records = self.lock();
        match records.get_mut(name) {
            Some(existing) => {
                existing.value = value;
                existing.alarmed = alarmed;
                existing.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_alarmed(&self, name: &str, alarmed: bool) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let mut records = self.lock();
        match records.get_mut(name) {
            Some(existing) => {
                existing.alarmed = alarmed;
                existing.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
