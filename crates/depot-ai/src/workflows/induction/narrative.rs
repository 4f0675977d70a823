use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::domain::Zone;

/// Operator-facing summary of one induction plan. Template-based and fully
/// derived from the assignments; no hidden state, no randomness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationNarrative {
    pub summary: String,
    pub key_changes: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn generate_narrative(assignments: &[Assignment], is_simulation: bool) -> OptimizationNarrative {
    let key_changes = Vec::new();
    let mut recommendations = Vec::new();
    let mut warnings = Vec::new();

    let service_count = assignments
        .iter()
        .filter(|a| a.assigned_zone == Zone::Service)
        .count();
    let maintenance_count = assignments
        .iter()
        .filter(|a| a.assigned_zone == Zone::Ibl)
        .count();

    if service_count < 15 {
        warnings.push(format!(
            "Only {service_count} trains assigned to service - may impact punctuality"
        ));
    }

    if maintenance_count > 5 {
        warnings.push(format!(
            "{maintenance_count} trains in maintenance - high maintenance load"
        ));
    }

    let low_score_count = assignments.iter().filter(|a| a.score < 60).count();
    if low_score_count > 0 {
        recommendations.push(format!(
            "Focus on improving {low_score_count} trains with scores below 60"
        ));
    }

    let branding_issue_count = assignments
        .iter()
        .filter(|a| a.factors.branding < 50)
        .count();
    if branding_issue_count > 0 {
        recommendations.push(format!(
            "Address branding compliance for {branding_issue_count} trains"
        ));
    }

    let total = assignments.len().max(1) as f64;
    let mean_score =
        (assignments.iter().map(|a| f64::from(a.score)).sum::<f64>() / total).round();

    let summary = if is_simulation {
        format!(
            "Simulation completed: {} trains optimized with {service_count} in service",
            assignments.len()
        )
    } else {
        format!(
            "Optimization completed: {} trains assigned with average score of {mean_score}",
            assignments.len()
        )
    };

    OptimizationNarrative {
        summary,
        key_changes,
        recommendations,
        warnings,
    }
}
