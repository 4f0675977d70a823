use super::common::{bare_train, fixed_now, healthy_train};
use crate::workflows::induction::domain::{TrainId, TrainStatus, Zone};
use crate::workflows::induction::scoring::score_train;
use crate::workflows::induction::simulation::{apply_overrides, FieldOverride, TrainOverride};

fn override_for(id: &str, changes: Vec<FieldOverride>) -> TrainOverride {
    TrainOverride {
        train_id: TrainId(id.to_string()),
        changes,
    }
}

#[test]
fn input_fleet_is_never_mutated() {
    let trains = vec![healthy_train("TS-01"), healthy_train("TS-02")];
    let snapshot = trains.clone();

    let overrides = vec![override_for(
        "TS-01",
        vec![
            FieldOverride::Status(TrainStatus::Maintenance),
            FieldOverride::OpenWorkOrders(4),
        ],
    )];

    let patched = apply_overrides(&trains, &overrides);

    assert_eq!(trains, snapshot);
    assert_eq!(patched[0].status, TrainStatus::Maintenance);
    assert_eq!(
        patched[0]
            .job_card_status
            .as_ref()
            .map(|jc| jc.open_work_orders),
        Some(4)
    );
    // The untouched train passes through as an exact clone.
    assert_eq!(patched[1], trains[1]);
}

#[test]
fn overrides_only_touch_the_named_train() {
    let trains = vec![healthy_train("TS-01"), healthy_train("TS-02")];
    let overrides = vec![override_for(
        "TS-99",
        vec![FieldOverride::Status(TrainStatus::Inspection)],
    )];

    let patched = apply_overrides(&trains, &overrides);
    assert_eq!(patched, trains);
}

#[test]
fn fitness_override_wins_over_stale_certificate_windows() {
    // The healthy fixture carries valid windows; without clearing them the
    // fresh-deduction path would report 100 and mask the override.
    let trains = vec![healthy_train("TS-01")];
    let overrides = vec![override_for(
        "TS-01",
        vec![FieldOverride::FitnessOverallScore(35)],
    )];

    let patched = apply_overrides(&trains, &overrides);
    let factors = score_train(&patched[0], &[], fixed_now());
    assert_eq!(factors.fitness, 35.0);
}

#[test]
fn overrides_materialize_missing_blocks() {
    let trains = vec![bare_train("TS-01")];
    let overrides = vec![override_for(
        "TS-01",
        vec![
            FieldOverride::GeometryScore(42),
            FieldOverride::ShuntingDistance(300.0),
            FieldOverride::CleaningScore(55),
        ],
    )];

    let patched = apply_overrides(&trains, &overrides);
    let geometry = patched[0].stabling_geometry.as_ref().expect("geometry created");
    assert_eq!(geometry.score, 42);
    assert_eq!(geometry.shunting_distance, 300.0);
    assert_eq!(patched[0].cleaning_detailing.as_ref().map(|c| c.score), Some(55));

    let factors = score_train(&patched[0], &[], fixed_now());
    assert_eq!(factors.geometry, 42.0);
    assert_eq!(factors.cleaning, 55.0);
}

#[test]
fn branding_hours_on_a_blank_contract_score_zero() {
    // Materializing the branding block leaves contract_hours at zero, and a
    // zero-hour contract scores 0 regardless of completed hours.
    let trains = vec![bare_train("TS-01")];
    let overrides = vec![override_for(
        "TS-01",
        vec![FieldOverride::BrandingCompletedHours(120.0)],
    )];

    let patched = apply_overrides(&trains, &overrides);
    let factors = score_train(&patched[0], &[], fixed_now());
    assert_eq!(factors.branding, 0.0);
}

#[test]
fn later_changes_overwrite_earlier_ones() {
    let trains = vec![bare_train("TS-01")];
    let overrides = vec![override_for(
        "TS-01",
        vec![
            FieldOverride::PositionZone(Zone::Cleaning),
            FieldOverride::PositionZone(Zone::Ibl),
        ],
    )];

    let patched = apply_overrides(&trains, &overrides);
    assert_eq!(patched[0].position.zone, Zone::Ibl);
}

#[test]
fn override_payloads_round_trip_through_tagged_json() {
    let parsed: TrainOverride = serde_json::from_value(serde_json::json!({
        "train_id": "TS-01",
        "changes": [
            { "field": "status", "value": "maintenance" },
            { "field": "open-work-orders", "value": 3 },
            { "field": "shunting-distance", "value": 120.5 }
        ]
    }))
    .expect("valid override payload");

    assert_eq!(parsed.train_id.as_str(), "TS-01");
    assert_eq!(parsed.changes.len(), 3);
    assert_eq!(parsed.changes[0], FieldOverride::Status(TrainStatus::Maintenance));
}

#[test]
fn unknown_override_fields_are_rejected() {
    let result: Result<TrainOverride, _> = serde_json::from_value(serde_json::json!({
        "train_id": "TS-01",
        "changes": [
            { "field": "axle-temperature", "value": 90 }
        ]
    }));

    assert!(result.is_err());
}
