use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use depot_ai::config::EngineSettings;
use depot_ai::error::AppError;
use depot_ai::workflows::induction::{
    ActualOutcomes, EngineConfig, OptimizationRun, RepositoryError, RunId, RunRepository,
    SensorFeed, SensorFeedError, SensorReading, Train, TrainId,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Run history held in process memory, newest first. Stands in for the
/// operational database in single-node deployments and demos.
#[derive(Default)]
pub(crate) struct InMemoryRunRepository {
    runs: Mutex<Vec<OptimizationRun>>,
}

impl RunRepository for InMemoryRunRepository {
    fn insert(&self, run: OptimizationRun) -> Result<(), RepositoryError> {
        let mut guard = self.runs.lock().expect("run repository mutex poisoned");
        if guard.iter().any(|existing| existing.run_id == run.run_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(0, run);
        Ok(())
    }

    fn latest(&self) -> Result<Option<OptimizationRun>, RepositoryError> {
        let guard = self.runs.lock().expect("run repository mutex poisoned");
        Ok(guard.first().cloned())
    }

    fn latest_with_outcomes(&self) -> Result<Option<OptimizationRun>, RepositoryError> {
        let guard = self.runs.lock().expect("run repository mutex poisoned");
        Ok(guard.iter().find(|run| run.actual_outcomes.is_some()).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<OptimizationRun>, RepositoryError> {
        let guard = self.runs.lock().expect("run repository mutex poisoned");
        Ok(guard.iter().take(limit).cloned().collect())
    }

    fn append_outcomes(&self, id: &RunId, outcomes: ActualOutcomes) -> Result<(), RepositoryError> {
        let mut guard = self.runs.lock().expect("run repository mutex poisoned");
        let run = guard
            .iter_mut()
            .find(|run| &run.run_id == id)
            .ok_or(RepositoryError::NotFound)?;
        run.actual_outcomes = Some(outcomes);
        Ok(())
    }
}

/// Sensor telemetry buffer fed by whatever gateway integration is deployed.
/// Empty by default; trains without readings score the neutral IoT factor.
#[derive(Default)]
pub(crate) struct InMemorySensorFeed {
    readings: Mutex<HashMap<String, Vec<SensorReading>>>,
}

impl InMemorySensorFeed {
    pub(crate) fn record(&self, reading: SensorReading) {
        let mut guard = self.readings.lock().expect("sensor feed mutex poisoned");
        guard
            .entry(reading.train_id.as_str().to_string())
            .or_default()
            .push(reading);
    }
}

impl SensorFeed for InMemorySensorFeed {
    fn latest_readings(
        &self,
        train_ids: &[TrainId],
        since: DateTime<Utc>,
    ) -> Result<Vec<SensorReading>, SensorFeedError> {
        let guard = self.readings.lock().expect("sensor feed mutex poisoned");
        Ok(train_ids
            .iter()
            .flat_map(|id| {
                guard
                    .get(id.as_str())
                    .map(|readings| {
                        readings
                            .iter()
                            .filter(|reading| reading.recorded_at >= since)
                            .cloned()
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default()
            })
            .collect())
    }
}

pub(crate) fn engine_config(settings: &EngineSettings) -> EngineConfig {
    EngineConfig {
        iot_lookback_hours: settings.iot_lookback_hours,
        insight_window: settings.insight_window,
        ..EngineConfig::default()
    }
}

/// Reads a fleet snapshot from a JSON file holding an array of trains.
pub(crate) fn load_fleet(path: &Path) -> Result<Vec<Train>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let fleet: Vec<Train> = serde_json::from_str(&raw)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(fleet)
}
