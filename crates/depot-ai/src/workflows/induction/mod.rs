//! Nightly induction planning for a metro fleet.
//!
//! The pipeline runs synchronously in one pass per request: optional
//! what-if overrides, per-train factor scoring, weighted aggregation into a
//! 0-100 readiness score, greedy capacity-bounded zone assignment, fleet
//! metrics, and a templated narrative. The learning feedback loop runs
//! separately, grading a prior run's predictions against reported outcomes
//! to produce an adjusted weight vector.

pub mod assignment;
pub mod domain;
pub mod learning;
pub mod metrics;
pub mod narrative;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;
pub mod simulation;
pub mod weights;

#[cfg(test)]
mod tests;

pub use assignment::{
    assign_zones, Assignment, FactorBreakdown, OptimizationError, ScoredTrain, YardLayout,
};
pub use domain::{
    BrandingPriority, BrandingTier, CertificateWindow, CleaningDetailing, FitnessCertificate,
    JobCardStatus, MileageBalancing, SensorKind, SensorReading, SensorStatus, StablingGeometry,
    Train, TrainId, TrainStatus, YardPosition, Zone,
};
pub use learning::{learn_weights, ActualOutcomes};
pub use metrics::{compute_metrics, OptimizationMetrics};
pub use narrative::{generate_narrative, OptimizationNarrative};
pub use repository::{
    OptimizationRun, RepositoryError, RunId, RunRepository, SensorFeed, SensorFeedError,
};
pub use router::induction_router;
pub use scoring::{score_train, FactorScores};
pub use service::{
    EngineConfig, FleetInsights, InductionPlanner, MetricTrend, PlanOutcome, PlanRequest,
    PlanningError, TrendDirection,
};
pub use simulation::{apply_overrides, FieldOverride, TrainOverride};
pub use weights::{OptimizationWeights, ScenarioPreset, IOT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};
