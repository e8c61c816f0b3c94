//! Starts one [`SensorCycle`] per configured sensor.
//!
//! [`dispatch`] spawns the cycles and returns straight away with a
//! [`SensorFleet`] handle. Cycles never talk to each other; the store is
//! their only shared resource. Shutting the fleet down cancels every cycle
//! at its next sleep point.

use std::sync::Arc;
use std::time::Duration;

use thermo_db::store::SensorStore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cycle::{CycleTiming, SensorCycle};
use crate::generator::TemperatureSource;

/// Handle to the running sensor cycles.
pub struct SensorFleet {
    cancel: CancellationToken,
    tasks: Vec<(String, JoinHandle<()>)>,
}

/// Spawn one cycle per distinct name in `names`.
///
/// Must be called from within a Tokio runtime. A name listed twice gets a
/// single cycle, so no two tasks ever write the same record.
pub fn dispatch<S, T>(
    names: &[String],
    store: Arc<S>,
    source: Arc<T>,
    timing: CycleTiming,
) -> SensorFleet
where
    S: SensorStore + 'static,
    T: TemperatureSource + 'static,
{
    let cancel = CancellationToken::new();
    let mut tasks: Vec<(String, JoinHandle<()>)> = Vec::with_capacity(names.len());

    for name in names {
        if tasks.iter().any(|(running, _)| running == name) {
            tracing::warn!(sensor = %name, "Duplicate sensor name -- skipping");
            continue;
        }

        let cycle = SensorCycle::new(
            name.clone(),
            Arc::clone(&store),
            Arc::clone(&source),
            timing,
        );
        let handle = tokio::spawn(cycle.run(cancel.child_token()));
        tasks.push((name.clone(), handle));
    }

    tracing::info!(
        count = tasks.len(),
        tick = ?timing.unit,
        "Sensor cycles dispatched",
    );

    SensorFleet { cancel, tasks }
}

impl SensorFleet {
    /// Number of running cycles.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Names of the dispatched sensors, in dispatch order.
    pub fn sensor_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|(name, _)| name.as_str())
    }

    /// Cancel every cycle and wait up to `timeout` for them to finish.
    ///
    /// Cycles still running at the deadline are aborted. Returns how many
    /// stopped on their own.
    pub async fn shutdown(self, timeout: Duration) -> usize {
        self.cancel.cancel();

        let deadline = tokio::time::Instant::now() + timeout;
        let mut stopped = 0;

        for (name, mut handle) in self.tasks {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => stopped += 1,
                Ok(Err(e)) => {
                    tracing::error!(sensor = %name, error = %e, "Sensor cycle terminated abnormally");
                }
                Err(_) => {
                    tracing::warn!(sensor = %name, "Sensor cycle did not stop in time -- aborting");
                    handle.abort();
                }
            }
        }

        stopped
    }
}
