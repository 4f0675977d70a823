use crate::infra::{engine_config, load_fleet, InMemoryRunRepository, InMemorySensorFeed};
use chrono::{Duration, Utc};
use clap::Args;
use depot_ai::config::EngineSettings;
use depot_ai::error::AppError;
use depot_ai::workflows::induction::{
    ActualOutcomes, BrandingPriority, BrandingTier, CertificateWindow, CleaningDetailing,
    FieldOverride, FitnessCertificate, InductionPlanner, JobCardStatus, MileageBalancing,
    OptimizationWeights, PlanOutcome, PlanRequest, SensorKind, SensorReading, SensorStatus,
    StablingGeometry, Train, TrainId, TrainOverride, TrainStatus, YardPosition, Zone,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct PlanReportArgs {
    /// Fleet snapshot as a JSON array of trains. Defaults to a built-in
    /// 25-train sample depot.
    #[arg(long)]
    pub(crate) fleet: Option<PathBuf>,
    /// Scenario preset id (e.g. peak-hour-optimization, maintenance-window)
    #[arg(long)]
    pub(crate) scenario: Option<String>,
    /// Run as a what-if simulation instead of a live plan
    #[arg(long)]
    pub(crate) simulate: bool,
    /// Include the full bay-by-bay assignment listing in the output
    #[arg(long)]
    pub(crate) list_assignments: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Fleet snapshot as a JSON array of trains. Defaults to the sample depot.
    #[arg(long)]
    pub(crate) fleet: Option<PathBuf>,
    /// Scenario preset id applied to the baseline plan
    #[arg(long)]
    pub(crate) scenario: Option<String>,
    /// Skip the outcome feedback portion of the demo
    #[arg(long)]
    pub(crate) skip_feedback: bool,
}

fn demo_settings() -> EngineSettings {
    EngineSettings {
        iot_lookback_hours: 24,
        insight_window: 30,
    }
}

fn resolve_fleet(path: Option<PathBuf>) -> Result<Vec<Train>, AppError> {
    match path {
        Some(path) => load_fleet(&path),
        None => Ok(sample_fleet()),
    }
}

pub(crate) fn run_plan_report(args: PlanReportArgs) -> Result<(), AppError> {
    let PlanReportArgs {
        fleet,
        scenario,
        simulate,
        list_assignments,
    } = args;

    let trains = resolve_fleet(fleet)?;
    let sensors = Arc::new(InMemorySensorFeed::default());
    seed_sensor_readings(&sensors, &trains);
    let planner = InductionPlanner::new(
        Arc::new(InMemoryRunRepository::default()),
        sensors,
        engine_config(&demo_settings()),
    );

    let request = PlanRequest {
        requested_by: "cli".to_string(),
        trains,
        scenario,
        overrides: Vec::new(),
    };
    let outcome = planner.plan(&request, simulate)?;
    render_plan(&outcome, list_assignments);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        fleet,
        scenario,
        skip_feedback,
    } = args;

    let trains = resolve_fleet(fleet)?;
    let sensors = Arc::new(InMemorySensorFeed::default());
    seed_sensor_readings(&sensors, &trains);
    let planner = InductionPlanner::new(
        Arc::new(InMemoryRunRepository::default()),
        sensors,
        engine_config(&demo_settings()),
    );

    println!("Depot induction demo");
    println!("Fleet size: {} trains", trains.len());

    let baseline_request = PlanRequest {
        requested_by: "demo".to_string(),
        trains: trains.clone(),
        scenario,
        overrides: Vec::new(),
    };
    let baseline = planner.plan(&baseline_request, false)?;
    render_plan(&baseline, false);

    let subject = baseline
        .assignments
        .iter()
        .find(|a| a.assigned_zone == Zone::Service)
        .map(|a| a.train_id.clone());

    if let Some(train_id) = subject {
        println!("\nWhat-if: {} fails overnight inspection", train_id.as_str());
        let what_if_request = PlanRequest {
            requested_by: "demo".to_string(),
            trains: trains.clone(),
            scenario: None,
            overrides: vec![TrainOverride {
                train_id: train_id.clone(),
                changes: vec![
                    FieldOverride::OpenWorkOrders(6),
                    FieldOverride::FitnessOverallScore(25),
                ],
            }],
        };
        let simulated = planner.plan(&what_if_request, true)?;
        let moved = simulated
            .assignments
            .iter()
            .find(|a| a.train_id == train_id);
        match moved {
            Some(assignment) => println!(
                "- {} reassigned to {} bay {} ({})",
                train_id.as_str(),
                assignment.assigned_zone.label(),
                assignment.bay,
                assignment.reasoning
            ),
            None => println!("- {} missing from the simulated plan", train_id.as_str()),
        }
        println!(
            "- Simulated service strength: {}/{} trains",
            simulated.metrics.service_trains, simulated.metrics.total_trains
        );
    }

    if skip_feedback {
        return Ok(());
    }

    println!("\nOutcome feedback");
    // Synthetic morning-after report: punctuality and branding both came in
    // under the prediction.
    let reported = ActualOutcomes {
        punctuality: baseline.metrics.punctuality - 4.0,
        energy_usage: f64::from(baseline.metrics.energy_efficiency) + 6.0,
        maintenance_cost: baseline.metrics.shunting_cost as f64 + 150.0,
        branding_compliance: f64::from(baseline.metrics.branding_compliance) - 5.0,
        service_disruptions: 2,
    };
    println!(
        "- Reported: punctuality {:.1}, energy usage {:.1}, maintenance cost {:.0}, branding {:.1}",
        reported.punctuality,
        reported.energy_usage,
        reported.maintenance_cost,
        reported.branding_compliance
    );

    let learned = planner.record_outcomes(reported)?;
    println!("- Adjusted weights for the next run:");
    render_weights(&learned);

    Ok(())
}

fn render_plan(outcome: &PlanOutcome, list_assignments: bool) {
    println!("\n{}", outcome.narrative.summary);
    println!(
        "Zones: {} service / {} standby / {} maintenance",
        outcome.metrics.service_trains,
        outcome.metrics.standby_trains,
        outcome.metrics.maintenance_trains
    );
    println!(
        "Fleet average score {} | energy efficiency {} | shunting cost {} | punctuality {:.1}",
        outcome.metrics.average_score,
        outcome.metrics.energy_efficiency,
        outcome.metrics.shunting_cost,
        outcome.metrics.punctuality
    );
    println!(
        "Branding compliance {} | mileage balance {}",
        outcome.metrics.branding_compliance, outcome.metrics.mileage_balance
    );

    if outcome.narrative.warnings.is_empty() {
        println!("Warnings: none");
    } else {
        println!("Warnings:");
        for warning in &outcome.narrative.warnings {
            println!("- {warning}");
        }
    }

    if !outcome.narrative.recommendations.is_empty() {
        println!("Recommendations:");
        for recommendation in &outcome.narrative.recommendations {
            println!("- {recommendation}");
        }
    }

    if list_assignments {
        println!("\nAssignments by score");
        for assignment in &outcome.assignments {
            println!(
                "- {} | score {} | {} bay {} ({:.0}, {:.0}) | {}",
                assignment.train_id.as_str(),
                assignment.score,
                assignment.assigned_zone.label(),
                assignment.bay,
                assignment.x,
                assignment.y,
                assignment.reasoning
            );
        }
    }
}

fn render_weights(weights: &OptimizationWeights) {
    println!(
        "  fitness {:.3} | job card {:.3} | branding {:.3} | mileage {:.3}",
        weights.fitness, weights.job_card, weights.branding, weights.mileage
    );
    println!(
        "  cleaning {:.3} | geometry {:.3} | energy {:.3} | shunting {:.3}",
        weights.cleaning, weights.geometry, weights.energy, weights.shunting
    );
}

/// Deterministic 25-train sample depot used when no fleet snapshot is given.
/// Condition varies by index so every zone and narrative branch shows up.
pub(crate) fn sample_fleet() -> Vec<Train> {
    (1..=25).map(sample_train).collect()
}

fn sample_train(index: u32) -> Train {
    let id = format!("KM-{index:02}");
    let now = Utc::now();

    let expired_rolling_stock = index % 9 == 0;
    let open_work_orders = if index % 6 == 0 { index % 4 + 2 } else { 0 };
    let contract_hours = 150.0 + f64::from(index % 5) * 20.0;
    let completed_hours = contract_hours * (0.55 + f64::from(index % 4) * 0.14);

    let window = |expired: bool| CertificateWindow {
        valid: !expired,
        expiry_date: if expired {
            now - Duration::days(12)
        } else {
            now + Duration::days(90 + i64::from(index))
        },
        score: if expired { 40 } else { 90 },
    };

    Train {
        train_id: TrainId(id.clone()),
        name: format!("Krishna-{index:02}"),
        status: TrainStatus::Standby,
        position: YardPosition {
            zone: Zone::Standby,
            bay: format!("ST{}", index % 6 + 1),
            x: f64::from(index % 6 + 1) * 100.0,
            y: 150.0,
        },
        fitness_certificate: Some(FitnessCertificate {
            rolling_stock: Some(window(expired_rolling_stock)),
            signalling: Some(window(false)),
            telecom: Some(window(false)),
            overall_score: 90,
        }),
        job_card_status: Some(JobCardStatus {
            open_work_orders,
            closed_work_orders: 10 + index % 7,
            critical_issues: Vec::new(),
            next_due_date: None,
            score: 100,
        }),
        branding_priority: Some(BrandingPriority {
            advertiser: "Malabar Retail".to_string(),
            contract_hours,
            completed_hours,
            priority: if index % 3 == 0 {
                BrandingTier::High
            } else {
                BrandingTier::Medium
            },
            sla_deadline: None,
            score: 0,
        }),
        mileage_balancing: Some(MileageBalancing {
            current_mileage: 30_000.0 + f64::from(index) * 450.0,
            target_mileage: 42_000.0,
            bogie_wear: 18.0 + f64::from(index % 10),
            brake_pad_wear: 22.0 + f64::from(index % 8),
            hvac_wear: 12.0 + f64::from(index % 6),
            score: 70 + (index % 6 * 5) as u8,
        }),
        cleaning_detailing: Some(CleaningDetailing {
            last_deep_clean: None,
            next_scheduled: None,
            bay_occupied: false,
            manpower_available: index % 4 != 0,
            score: 65 + (index % 7 * 5) as u8,
        }),
        stabling_geometry: Some(StablingGeometry {
            current_bay: format!("ST{}", index % 6 + 1),
            optimal_bay: format!("S{}", index % 18 + 1),
            shunting_distance: 8.0 + f64::from(index % 9) * 6.0,
            turn_out_time_minutes: 4.0 + f64::from(index % 5),
            score: 70 + (index % 5 * 6) as u8,
        }),
        overall_score: 0,
        last_optimized: None,
    }
}

/// Seeds a few warning and critical readings so the IoT factor is visible in
/// demo output.
fn seed_sensor_readings(feed: &InMemorySensorFeed, trains: &[Train]) {
    let now = Utc::now();
    for (index, train) in trains.iter().enumerate() {
        let status = match index % 8 {
            0 => SensorStatus::Warning,
            4 => SensorStatus::Critical,
            _ => SensorStatus::Normal,
        };
        feed.record(SensorReading {
            train_id: train.train_id.clone(),
            kind: SensorKind::Vibration,
            value: 1.2 + index as f64 * 0.1,
            unit: "mm/s".to_string(),
            status,
            recorded_at: now - Duration::hours(2),
        });
    }
}
