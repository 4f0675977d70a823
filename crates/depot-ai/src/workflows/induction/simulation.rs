use serde::{Deserialize, Serialize};

use super::domain::{Train, TrainId, TrainStatus, Zone};

/// What-if delta for a single train.
///
/// Field paths are a closed, typed union instead of an arbitrary JSON merge:
/// an unknown path fails deserialization up front rather than leaking an
/// unvalidated value into the domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOverride {
    pub train_id: TrainId,
    pub changes: Vec<FieldOverride>,
}

/// Known overridable field paths with their typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "kebab-case")]
pub enum FieldOverride {
    Status(TrainStatus),
    PositionZone(Zone),
    PositionBay(String),
    FitnessOverallScore(u8),
    OpenWorkOrders(u32),
    BrandingCompletedHours(f64),
    MileageScore(u8),
    CleaningScore(u8),
    GeometryScore(u8),
    ShuntingDistance(f64),
}

/// Applies per-train overrides to a copy of the fleet.
///
/// The input slice is never mutated; trains without a matching override
/// pass through as clones. Simulation results built from the returned list
/// must not be written back to the system of record.
pub fn apply_overrides(trains: &[Train], overrides: &[TrainOverride]) -> Vec<Train> {
    trains
        .iter()
        .map(|train| {
            let mut train = train.clone();
            let train_id = train.train_id.clone();
            for entry in overrides.iter().filter(|o| o.train_id == train_id) {
                for change in &entry.changes {
                    apply_change(&mut train, change);
                }
            }
            train
        })
        .collect()
}

fn apply_change(train: &mut Train, change: &FieldOverride) {
    match change {
        FieldOverride::Status(status) => train.status = *status,
        FieldOverride::PositionZone(zone) => train.position.zone = *zone,
        FieldOverride::PositionBay(bay) => train.position.bay = bay.clone(),
        FieldOverride::FitnessOverallScore(score) => {
            let certificate = train.fitness_certificate.get_or_insert_with(Default::default);
            // Force the passthrough path so the override wins over stale windows.
            certificate.rolling_stock = None;
            certificate.signalling = None;
            certificate.telecom = None;
            certificate.overall_score = *score;
        }
        FieldOverride::OpenWorkOrders(count) => {
            train
                .job_card_status
                .get_or_insert_with(Default::default)
                .open_work_orders = *count;
        }
        FieldOverride::BrandingCompletedHours(hours) => {
            train
                .branding_priority
                .get_or_insert_with(Default::default)
                .completed_hours = *hours;
        }
        FieldOverride::MileageScore(score) => {
            train
                .mileage_balancing
                .get_or_insert_with(Default::default)
                .score = *score;
        }
        FieldOverride::CleaningScore(score) => {
            train
                .cleaning_detailing
                .get_or_insert_with(Default::default)
                .score = *score;
        }
        FieldOverride::GeometryScore(score) => {
            train
                .stabling_geometry
                .get_or_insert_with(Default::default)
                .score = *score;
        }
        FieldOverride::ShuntingDistance(distance) => {
            train
                .stabling_geometry
                .get_or_insert_with(Default::default)
                .shunting_distance = *distance;
        }
    }
}
