use serde::{Deserialize, Serialize};

use super::metrics::OptimizationMetrics;
use super::weights::{OptimizationWeights, MAX_WEIGHT, MIN_WEIGHT};

/// Default proportional step applied to prediction errors.
pub const LEARNING_RATE: f64 = 0.1;

/// Observed outcomes reported after a planned day of operation, used to
/// grade the prior run's predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActualOutcomes {
    pub punctuality: f64,
    pub energy_usage: f64,
    pub maintenance_cost: f64,
    pub branding_compliance: f64,
    #[serde(default)]
    pub service_disruptions: u32,
}

/// Nudges the weight vector by bounded proportional error, then clamps each
/// component into [MIN_WEIGHT, MAX_WEIGHT] and renormalizes to sum 1.
///
/// Adjustments are always computed relative to the fixed default vector,
/// never the previously learned one, so learning does not compound across
/// runs. The source system behaves this way consistently; kept as-is
/// rather than silently switched to compounding updates.
pub fn learn_weights(
    predicted: &OptimizationMetrics,
    actual: &ActualOutcomes,
    learning_rate: f64,
) -> OptimizationWeights {
    let punctuality_error = (predicted.punctuality - actual.punctuality).abs() / 100.0;
    let energy_error = (f64::from(predicted.energy_efficiency) - actual.energy_usage).abs() / 100.0;
    let maintenance_error =
        (predicted.shunting_cost as f64 - actual.maintenance_cost).abs() / 1000.0;
    let branding_error =
        (f64::from(predicted.branding_compliance) - actual.branding_compliance).abs() / 100.0;

    let defaults = OptimizationWeights::default();
    let adjusted = OptimizationWeights {
        fitness: defaults.fitness + punctuality_error * learning_rate,
        job_card: defaults.job_card + maintenance_error * learning_rate,
        branding: defaults.branding + branding_error * learning_rate,
        mileage: defaults.mileage + (punctuality_error + maintenance_error) * learning_rate * 0.5,
        cleaning: defaults.cleaning + maintenance_error * learning_rate * 0.5,
        geometry: defaults.geometry + energy_error * learning_rate,
        energy: defaults.energy + energy_error * learning_rate,
        shunting: defaults.shunting + energy_error * learning_rate,
    };

    adjusted.clamped(MIN_WEIGHT, MAX_WEIGHT).normalized()
}
