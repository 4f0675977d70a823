use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::assignment::{assign_zones, Assignment, OptimizationError, ScoredTrain, YardLayout};
use super::domain::{SensorReading, Train, TrainId};
use super::learning::{learn_weights, ActualOutcomes, LEARNING_RATE};
use super::metrics::{compute_metrics, OptimizationMetrics};
use super::narrative::{generate_narrative, OptimizationNarrative};
use super::repository::{OptimizationRun, RepositoryError, RunId, RunRepository, SensorFeed};
use super::scoring::score_train;
use super::simulation::{apply_overrides, TrainOverride};
use super::weights::{OptimizationWeights, ScenarioPreset};

/// Engine-level knobs. Zone capacities come from the yard layout tables;
/// everything here has a production default.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub weights: OptimizationWeights,
    pub layout: YardLayout,
    pub learning_rate: f64,
    pub iot_lookback_hours: i64,
    pub insight_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: OptimizationWeights::default(),
            layout: YardLayout::default(),
            learning_rate: LEARNING_RATE,
            iot_lookback_hours: 24,
            insight_window: 30,
        }
    }
}

/// One planning request: the fleet snapshot plus run options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub requested_by: String,
    pub trains: Vec<Train>,
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub overrides: Vec<TrainOverride>,
}

/// Full result of one optimization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub assignments: Vec<Assignment>,
    pub metrics: OptimizationMetrics,
    pub narrative: OptimizationNarrative,
    pub weights: OptimizationWeights,
    pub is_simulation: bool,
    pub duration_ms: u64,
}

/// Deterministic per-metric trend over the stored run history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTrend {
    pub metric: &'static str,
    pub direction: TrendDirection,
    pub change: f64,
    pub significance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// History-derived insight bundle for the learning dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetInsights {
    pub trends: Vec<MetricTrend>,
    pub recommendations: Vec<String>,
}

static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_run_id() -> RunId {
    let id = RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RunId(format!("run-{id:06}"))
}

/// Service composing the scorer, assigner, metrics, narrative, and learner
/// behind the storage seams.
pub struct InductionPlanner<R, S> {
    repository: Arc<R>,
    sensors: Arc<S>,
    config: EngineConfig,
}

impl<R, S> InductionPlanner<R, S>
where
    R: RunRepository + 'static,
    S: SensorFeed + 'static,
{
    pub fn new(repository: Arc<R>, sensors: Arc<S>, config: EngineConfig) -> Self {
        Self {
            repository,
            sensors,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one full optimization pass over the supplied fleet snapshot.
    ///
    /// Simulations operate on an isolated copy of the fleet and are never
    /// persisted. Live runs are appended to the run store fire-and-forget:
    /// a storage failure is logged and the computed plan is still returned.
    pub fn plan(&self, request: &PlanRequest, is_simulation: bool) -> Result<PlanOutcome, PlanningError> {
        if request.trains.is_empty() {
            return Err(OptimizationError::EmptyFleet.into());
        }

        let started = Instant::now();
        let now = Utc::now();

        let trains = if is_simulation && !request.overrides.is_empty() {
            apply_overrides(&request.trains, &request.overrides)
        } else {
            request.trains.clone()
        };

        let readings = self.fetch_readings(&trains);
        let weights = self.resolve_weights(request.scenario.as_deref());

        let scored: Vec<ScoredTrain> = trains
            .iter()
            .map(|train| {
                let own: Vec<SensorReading> = readings
                    .iter()
                    .filter(|reading| reading.train_id == train.train_id)
                    .cloned()
                    .collect();
                let factors = score_train(train, &own, now);
                ScoredTrain {
                    train_id: train.train_id.clone(),
                    overall_score: weights.aggregate(&factors),
                    factors,
                }
            })
            .collect();

        let assignments = assign_zones(&scored, &self.config.layout)?;
        let metrics = compute_metrics(&assignments, &trains);
        let narrative = generate_narrative(&assignments, is_simulation);
        let duration_ms = started.elapsed().as_millis() as u64;

        if !is_simulation {
            let run = OptimizationRun {
                run_id: next_run_id(),
                date: now,
                requested_by: request.requested_by.clone(),
                assignments: assignments.clone(),
                metrics,
                weights,
                narrative: narrative.clone(),
                duration_ms,
                is_simulation,
                actual_outcomes: None,
            };
            if let Err(err) = self.repository.insert(run) {
                // The plan is already computed; losing the audit record must
                // not discard it from the response.
                error!(%err, "failed to persist optimization run");
            }
        }

        Ok(PlanOutcome {
            assignments,
            metrics,
            narrative,
            weights,
            is_simulation,
            duration_ms,
        })
    }

    /// Grades the latest live run against reported outcomes and returns the
    /// adjusted weight vector. With no prior run to learn from, the default
    /// vector comes back unchanged instead of an error.
    pub fn record_outcomes(
        &self,
        outcomes: ActualOutcomes,
    ) -> Result<OptimizationWeights, PlanningError> {
        let Some(run) = self.repository.latest()? else {
            warn!("no prior optimization run to learn from");
            return Ok(OptimizationWeights::default());
        };

        let learned = learn_weights(&run.metrics, &outcomes, self.config.learning_rate);

        if let Err(err) = self.repository.append_outcomes(&run.run_id, outcomes) {
            error!(%err, run_id = %run.run_id.0, "failed to record actual outcomes");
        }

        Ok(learned)
    }

    /// Resolves the weight vector for a run: a named scenario preset wins,
    /// then the latest outcome-graded run's weights, then the configured
    /// default.
    pub fn resolve_weights(&self, scenario: Option<&str>) -> OptimizationWeights {
        if let Some(preset) = scenario.and_then(ScenarioPreset::from_id) {
            return preset.weights();
        }

        match self.repository.latest_with_outcomes() {
            Ok(Some(run)) => run.weights,
            Ok(None) => self.config.weights,
            Err(err) => {
                warn!(%err, "run store unavailable while resolving weights");
                self.config.weights
            }
        }
    }

    pub fn latest_run(&self) -> Result<Option<OptimizationRun>, PlanningError> {
        Ok(self.repository.latest()?)
    }

    /// Deterministic trend readout over recent run history. Requires at
    /// least five stored runs before trends are computed.
    pub fn insights(&self) -> Result<FleetInsights, PlanningError> {
        let history = self.repository.recent(self.config.insight_window)?;

        if history.len() < 5 {
            return Ok(FleetInsights {
                trends: Vec::new(),
                recommendations: vec![
                    "Insufficient historical data for predictions".to_string()
                ],
            });
        }

        let punctuality: Vec<f64> = history.iter().map(|run| run.metrics.punctuality).collect();
        let energy: Vec<f64> = history
            .iter()
            .map(|run| f64::from(run.metrics.energy_efficiency))
            .collect();

        let trends = vec![
            metric_trend("punctuality", &punctuality),
            metric_trend("energy_efficiency", &energy),
        ];

        let mut recommendations = Vec::new();
        for trend in &trends {
            if trend.direction == TrendDirection::Decreasing && trend.significance > 0.7 {
                match trend.metric {
                    "punctuality" => recommendations.push(
                        "Punctuality showing declining trend - review maintenance scheduling"
                            .to_string(),
                    ),
                    "energy_efficiency" => recommendations.push(
                        "Energy efficiency declining - optimize train routing and positioning"
                            .to_string(),
                    ),
                    _ => {}
                }
            }
        }

        if let Some(latest) = history.first() {
            if latest.metrics.average_score < 75 {
                recommendations.push(
                    "Average fleet score below target - prioritize maintenance and fitness certificates"
                        .to_string(),
                );
            }
            if latest.metrics.maintenance_trains > 5 {
                recommendations.push(
                    "High maintenance count - consider preventive maintenance scheduling"
                        .to_string(),
                );
            }
        }

        Ok(FleetInsights {
            trends,
            recommendations,
        })
    }

    fn fetch_readings(&self, trains: &[Train]) -> Vec<SensorReading> {
        let train_ids: Vec<TrainId> = trains.iter().map(|train| train.train_id.clone()).collect();
        let since = Utc::now() - Duration::hours(self.config.iot_lookback_hours);

        match self.sensors.latest_readings(&train_ids, since) {
            Ok(readings) => readings,
            Err(err) => {
                // Scoring falls back to the neutral IoT factor.
                warn!(%err, "sensor feed unavailable, scoring without IoT data");
                Vec::new()
            }
        }
    }
}

/// Half-window mean comparison; direction flips outside a +/-0.05 band.
fn metric_trend(metric: &'static str, values: &[f64]) -> MetricTrend {
    if values.len() < 2 {
        return MetricTrend {
            metric,
            direction: TrendDirection::Stable,
            change: 0.0,
            significance: 0.0,
        };
    }

    // History arrives newest first; the "first half" is the recent window.
    let midpoint = values.len() / 2;
    let recent_mean = mean(&values[..midpoint]);
    let earlier_mean = mean(&values[midpoint..]);

    let change = recent_mean - earlier_mean;
    let significance = if earlier_mean.abs() > f64::EPSILON {
        (change / earlier_mean).abs()
    } else {
        0.0
    };

    let direction = if change > 0.05 {
        TrendDirection::Increasing
    } else if change < -0.05 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    MetricTrend {
        metric,
        direction,
        change,
        significance,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Error raised by the planning service.
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error(transparent)]
    Optimization(#[from] OptimizationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
