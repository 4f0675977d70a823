use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::workflows::induction::assignment::ScoredTrain;
use crate::workflows::induction::domain::{
    BrandingPriority, BrandingTier, CertificateWindow, CleaningDetailing, FitnessCertificate,
    JobCardStatus, MileageBalancing, SensorKind, SensorReading, SensorStatus, StablingGeometry,
    Train, TrainId, TrainStatus, YardPosition, Zone,
};
use crate::workflows::induction::learning::ActualOutcomes;
use crate::workflows::induction::repository::{
    OptimizationRun, RepositoryError, RunId, RunRepository, SensorFeed, SensorFeedError,
};
use crate::workflows::induction::scoring::FactorScores;
use crate::workflows::induction::service::{EngineConfig, InductionPlanner, PlanRequest};

pub(super) fn fixed_now() -> DateTime<Utc> {
    // Relative to the live clock: the planner scores with `Utc::now()`, so a
    // frozen reference would let the fixture certificate windows rot.
    Utc::now()
}

pub(super) fn certificate_window(expired: bool) -> CertificateWindow {
    let expiry = if expired {
        fixed_now() - Duration::days(10)
    } else {
        fixed_now() + Duration::days(90)
    };
    CertificateWindow {
        valid: !expired,
        expiry_date: expiry,
        score: if expired { 40 } else { 95 },
    }
}

pub(super) fn healthy_train(id: &str) -> Train {
    Train {
        train_id: TrainId(id.to_string()),
        name: format!("Krishna-{id}"),
        status: TrainStatus::Standby,
        position: YardPosition {
            zone: Zone::Standby,
            bay: "ST1".to_string(),
            x: 100.0,
            y: 150.0,
        },
        fitness_certificate: Some(FitnessCertificate {
            rolling_stock: Some(certificate_window(false)),
            signalling: Some(certificate_window(false)),
            telecom: Some(certificate_window(false)),
            overall_score: 95,
        }),
        job_card_status: Some(JobCardStatus {
            open_work_orders: 0,
            closed_work_orders: 12,
            critical_issues: Vec::new(),
            next_due_date: None,
            score: 100,
        }),
        branding_priority: Some(BrandingPriority {
            advertiser: "Kochi FMCG".to_string(),
            contract_hours: 200.0,
            completed_hours: 180.0,
            priority: BrandingTier::High,
            sla_deadline: None,
            score: 90,
        }),
        mileage_balancing: Some(MileageBalancing {
            current_mileage: 41_000.0,
            target_mileage: 42_000.0,
            bogie_wear: 22.0,
            brake_pad_wear: 30.0,
            hvac_wear: 18.0,
            score: 92,
        }),
        cleaning_detailing: Some(CleaningDetailing {
            last_deep_clean: None,
            next_scheduled: None,
            bay_occupied: false,
            manpower_available: true,
            score: 88,
        }),
        stabling_geometry: Some(StablingGeometry {
            current_bay: "ST1".to_string(),
            optimal_bay: "S3".to_string(),
            shunting_distance: 12.0,
            turn_out_time_minutes: 6.0,
            score: 85,
        }),
        overall_score: 0,
        last_optimized: None,
    }
}

pub(super) fn bare_train(id: &str) -> Train {
    Train {
        train_id: TrainId(id.to_string()),
        name: format!("Krishna-{id}"),
        status: TrainStatus::Standby,
        position: YardPosition {
            zone: Zone::Standby,
            bay: "ST1".to_string(),
            x: 100.0,
            y: 150.0,
        },
        fitness_certificate: None,
        job_card_status: None,
        branding_priority: None,
        mileage_balancing: None,
        cleaning_detailing: None,
        stabling_geometry: None,
        overall_score: 0,
        last_optimized: None,
    }
}

pub(super) fn scored(id: &str, overall: u8, job_card: f64) -> ScoredTrain {
    ScoredTrain {
        train_id: TrainId(id.to_string()),
        factors: FactorScores {
            fitness: 90.0,
            job_card,
            branding: 80.0,
            mileage: 90.0,
            cleaning: 90.0,
            geometry: 90.0,
            iot: 50.0,
        },
        overall_score: overall,
    }
}

pub(super) fn reading(id: &str, status: SensorStatus) -> SensorReading {
    SensorReading {
        train_id: TrainId(id.to_string()),
        kind: SensorKind::Vibration,
        value: 2.1,
        unit: "mm/s".to_string(),
        status,
        recorded_at: fixed_now(),
    }
}

pub(super) fn outcomes() -> ActualOutcomes {
    ActualOutcomes {
        punctuality: 95.0,
        energy_usage: 94.0,
        maintenance_cost: 120.0,
        branding_compliance: 88.0,
        service_disruptions: 1,
    }
}

#[derive(Default)]
pub(super) struct MemoryRunRepository {
    pub(super) runs: Mutex<Vec<OptimizationRun>>,
}

impl MemoryRunRepository {
    pub(super) fn stored(&self) -> Vec<OptimizationRun> {
        self.runs.lock().expect("run mutex poisoned").clone()
    }
}

impl RunRepository for MemoryRunRepository {
    fn insert(&self, run: OptimizationRun) -> Result<(), RepositoryError> {
        let mut guard = self.runs.lock().expect("run mutex poisoned");
        if guard.iter().any(|existing| existing.run_id == run.run_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(0, run);
        Ok(())
    }

    fn latest(&self) -> Result<Option<OptimizationRun>, RepositoryError> {
        let guard = self.runs.lock().expect("run mutex poisoned");
        Ok(guard.first().cloned())
    }

    fn latest_with_outcomes(&self) -> Result<Option<OptimizationRun>, RepositoryError> {
        let guard = self.runs.lock().expect("run mutex poisoned");
        Ok(guard.iter().find(|run| run.actual_outcomes.is_some()).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<OptimizationRun>, RepositoryError> {
        let guard = self.runs.lock().expect("run mutex poisoned");
        Ok(guard.iter().take(limit).cloned().collect())
    }

    fn append_outcomes(&self, id: &RunId, outcomes: ActualOutcomes) -> Result<(), RepositoryError> {
        let mut guard = self.runs.lock().expect("run mutex poisoned");
        let run = guard
            .iter_mut()
            .find(|run| &run.run_id == id)
            .ok_or(RepositoryError::NotFound)?;
        run.actual_outcomes = Some(outcomes);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl RunRepository for UnavailableRepository {
    fn insert(&self, _run: OptimizationRun) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("run store offline".to_string()))
    }

    fn latest(&self) -> Result<Option<OptimizationRun>, RepositoryError> {
        Err(RepositoryError::Unavailable("run store offline".to_string()))
    }

    fn latest_with_outcomes(&self) -> Result<Option<OptimizationRun>, RepositoryError> {
        Err(RepositoryError::Unavailable("run store offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<OptimizationRun>, RepositoryError> {
        Err(RepositoryError::Unavailable("run store offline".to_string()))
    }

    fn append_outcomes(
        &self,
        _id: &RunId,
        _outcomes: ActualOutcomes,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("run store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct StaticSensorFeed {
    pub(super) readings: HashMap<String, Vec<SensorReading>>,
}

impl SensorFeed for StaticSensorFeed {
    fn latest_readings(
        &self,
        train_ids: &[TrainId],
        _since: DateTime<Utc>,
    ) -> Result<Vec<SensorReading>, SensorFeedError> {
        Ok(train_ids
            .iter()
            .flat_map(|id| self.readings.get(id.as_str()).cloned().unwrap_or_default())
            .collect())
    }
}

pub(super) struct OfflineSensorFeed;

impl SensorFeed for OfflineSensorFeed {
    fn latest_readings(
        &self,
        _train_ids: &[TrainId],
        _since: DateTime<Utc>,
    ) -> Result<Vec<SensorReading>, SensorFeedError> {
        Err(SensorFeedError::Unavailable("gateway timeout".to_string()))
    }
}

pub(super) fn build_planner() -> (
    InductionPlanner<MemoryRunRepository, StaticSensorFeed>,
    Arc<MemoryRunRepository>,
) {
    let repository = Arc::new(MemoryRunRepository::default());
    let sensors = Arc::new(StaticSensorFeed::default());
    let planner = InductionPlanner::new(repository.clone(), sensors, EngineConfig::default());
    (planner, repository)
}

pub(super) fn request(trains: Vec<Train>) -> PlanRequest {
    PlanRequest {
        requested_by: "supervisor@depot".to_string(),
        trains,
        scenario: None,
        overrides: Vec::new(),
    }
}
