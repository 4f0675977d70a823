use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::domain::{SensorReading, TrainId};
use super::learning::ActualOutcomes;
use super::metrics::OptimizationMetrics;
use super::narrative::OptimizationNarrative;
use super::weights::OptimizationWeights;

/// Identifier wrapper for persisted optimization runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

/// Persisted record of one optimization pass.
///
/// Created once at the end of a live (non-simulation) run; the
/// `actual_outcomes` field is appended later by the out-of-band feedback
/// submission. The engine never deletes runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRun {
    pub run_id: RunId,
    pub date: DateTime<Utc>,
    pub requested_by: String,
    pub assignments: Vec<Assignment>,
    pub metrics: OptimizationMetrics,
    pub weights: OptimizationWeights,
    pub narrative: OptimizationNarrative,
    pub duration_ms: u64,
    pub is_simulation: bool,
    #[serde(default)]
    pub actual_outcomes: Option<ActualOutcomes>,
}

/// Storage abstraction so the planner can be exercised in isolation.
pub trait RunRepository: Send + Sync {
    fn insert(&self, run: OptimizationRun) -> Result<(), RepositoryError>;
    /// Most recent live run, if any.
    fn latest(&self) -> Result<Option<OptimizationRun>, RepositoryError>;
    /// Most recent live run that already has reported outcomes.
    fn latest_with_outcomes(&self) -> Result<Option<OptimizationRun>, RepositoryError>;
    /// Up to `limit` live runs, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<OptimizationRun>, RepositoryError>;
    fn append_outcomes(&self, id: &RunId, outcomes: ActualOutcomes) -> Result<(), RepositoryError>;
}

/// Error enumeration for run-store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("run already exists")]
    Conflict,
    #[error("run not found")]
    NotFound,
    #[error("run store unavailable: {0}")]
    Unavailable(String),
}

/// Source of recent IoT readings for the fleet.
pub trait SensorFeed: Send + Sync {
    /// Latest readings for the given trains recorded at or after `since`.
    fn latest_readings(
        &self,
        train_ids: &[TrainId],
        since: DateTime<Utc>,
    ) -> Result<Vec<SensorReading>, SensorFeedError>;
}

/// Error enumeration for sensor-feed failures. A failed fetch degrades the
/// IoT factor to its neutral value; it never fails a planning pass.
#[derive(Debug, thiserror::Error)]
pub enum SensorFeedError {
    #[error("sensor feed unavailable: {0}")]
    Unavailable(String),
}
