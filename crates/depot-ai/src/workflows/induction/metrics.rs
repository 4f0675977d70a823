use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::domain::{Train, Zone};

/// Fleet-level snapshot derived from one assignment pass. Computed fresh on
/// every run, never mutated in place.
///
/// The estimates are deliberately simple analytic proxies with fixed
/// coefficients; downstream dashboards and the learner both depend on the
/// exact formulas, so do not "improve" them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    pub total_trains: usize,
    pub service_trains: usize,
    pub standby_trains: usize,
    pub maintenance_trains: usize,
    pub average_score: u32,
    pub energy_efficiency: u32,
    pub shunting_cost: u64,
    pub branding_compliance: u32,
    pub punctuality: f64,
    pub mileage_balance: i64,
}

/// Pure aggregation over the assignment set and the scored fleet.
pub fn compute_metrics(assignments: &[Assignment], trains: &[Train]) -> OptimizationMetrics {
    let service_trains = count_zone(assignments, Zone::Service);
    let standby_trains = count_zone(assignments, Zone::Standby);
    let maintenance_trains = count_zone(assignments, Zone::Ibl);

    let total = assignments.len().max(1) as f64;
    let average_score =
        assignments.iter().map(|a| f64::from(a.score)).sum::<f64>() / total;

    let distances: HashMap<&str, f64> = trains
        .iter()
        .map(|train| {
            let distance = train
                .stabling_geometry
                .as_ref()
                .map(|geometry| geometry.shunting_distance)
                .unwrap_or(0.0);
            (train.train_id.as_str(), distance)
        })
        .collect();

    let total_shunting_distance: f64 = assignments
        .iter()
        .map(|a| distances.get(a.train_id.as_str()).copied().unwrap_or(0.0))
        .sum();

    let energy_efficiency = (100.0 - total_shunting_distance * 0.1).max(0.0);

    let branding_compliance = assignments
        .iter()
        .map(|a| f64::from(a.factors.branding))
        .sum::<f64>()
        / total;

    OptimizationMetrics {
        total_trains: assignments.len(),
        service_trains,
        standby_trains,
        maintenance_trains,
        average_score: average_score.round() as u32,
        energy_efficiency: energy_efficiency.round() as u32,
        shunting_cost: (total_shunting_distance * 0.5).round() as u64,
        branding_compliance: branding_compliance.round() as u32,
        punctuality: (99.5 - maintenance_trains as f64 * 0.1).round(),
        mileage_balance: (100.0 - (service_trains as f64 - 15.0).abs() * 2.0).round() as i64,
    }
}

fn count_zone(assignments: &[Assignment], zone: Zone) -> usize {
    assignments
        .iter()
        .filter(|a| a.assigned_zone == zone)
        .count()
}
