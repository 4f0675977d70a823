use serde::{Deserialize, Serialize};

use super::domain::{TrainId, Zone};
use super::scoring::FactorScores;

/// A train together with its computed factor and overall scores, ready for
/// zone placement.
#[derive(Debug, Clone)]
pub struct ScoredTrain {
    pub train_id: TrainId,
    pub factors: FactorScores,
    pub overall_score: u8,
}

/// Output record per train: where it goes and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub train_id: TrainId,
    pub assigned_zone: Zone,
    pub bay: String,
    pub x: f64,
    pub y: f64,
    pub score: u8,
    pub reasoning: String,
    pub factors: FactorBreakdown,
}

/// Rounded sub-scores carried on each assignment for audit and narrative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub fitness: u8,
    pub job_card: u8,
    pub branding: u8,
    pub mileage: u8,
    pub cleaning: u8,
    pub geometry: u8,
}

impl FactorBreakdown {
    fn from_scores(factors: &FactorScores) -> Self {
        let round = |value: f64| value.clamp(0.0, 100.0).round() as u8;
        Self {
            fitness: round(factors.fitness),
            job_card: round(factors.job_card),
            branding: round(factors.branding),
            mileage: round(factors.mileage),
            cleaning: round(factors.cleaning),
            geometry: round(factors.geometry),
        }
    }
}

/// A named physical slot within a zone.
#[derive(Debug, Clone, PartialEq)]
pub struct BaySlot {
    pub bay: &'static str,
    pub x: f64,
    pub y: f64,
}

/// Bay tables per zone. Capacity per zone is the length of its table; the
/// defaults below match the current yard layout (18 service, 6 standby,
/// 4 IBL, 3 cleaning).
#[derive(Debug, Clone, PartialEq)]
pub struct YardLayout {
    pub service: Vec<BaySlot>,
    pub standby: Vec<BaySlot>,
    pub ibl: Vec<BaySlot>,
    pub cleaning: Vec<BaySlot>,
}

const fn slot(bay: &'static str, x: f64, y: f64) -> BaySlot {
    BaySlot { bay, x, y }
}

impl Default for YardLayout {
    fn default() -> Self {
        Self {
            service: vec![
                slot("S1", 100.0, 50.0),
                slot("S2", 150.0, 50.0),
                slot("S3", 200.0, 50.0),
                slot("S4", 250.0, 50.0),
                slot("S5", 300.0, 50.0),
                slot("S6", 350.0, 50.0),
                slot("S7", 400.0, 50.0),
                slot("S8", 450.0, 50.0),
                slot("S9", 500.0, 50.0),
                slot("S10", 550.0, 50.0),
                slot("S11", 600.0, 50.0),
                slot("S12", 650.0, 50.0),
                slot("S13", 700.0, 50.0),
                slot("S14", 750.0, 50.0),
                slot("S15", 800.0, 50.0),
                slot("S16", 850.0, 50.0),
                slot("S17", 900.0, 50.0),
                slot("S18", 950.0, 50.0),
            ],
            standby: vec![
                slot("ST1", 100.0, 150.0),
                slot("ST2", 200.0, 150.0),
                slot("ST3", 300.0, 150.0),
                slot("ST4", 400.0, 150.0),
                slot("ST5", 500.0, 150.0),
                slot("ST6", 600.0, 150.0),
            ],
            ibl: vec![
                slot("IBL1", 100.0, 250.0),
                slot("IBL2", 200.0, 250.0),
                slot("IBL3", 300.0, 250.0),
                slot("IBL4", 400.0, 250.0),
            ],
            cleaning: vec![
                slot("C1", 100.0, 350.0),
                slot("C2", 200.0, 350.0),
                slot("C3", 300.0, 350.0),
            ],
        }
    }
}

impl YardLayout {
    fn slots(&self, zone: Zone) -> &[BaySlot] {
        match zone {
            Zone::Service => &self.service,
            Zone::Standby => &self.standby,
            Zone::Ibl => &self.ibl,
            Zone::Cleaning => &self.cleaning,
        }
    }

    pub fn capacity(&self, zone: Zone) -> usize {
        self.slots(zone).len()
    }
}

/// Failure raised by the assignment step.
#[derive(Debug, thiserror::Error)]
pub enum OptimizationError {
    #[error("no trains to optimize")]
    EmptyFleet,
    #[error("no bays configured for the {} zone", zone.label())]
    NoBaysConfigured { zone: Zone },
}

/// Greedy score-ordered placement into the four yard zones.
///
/// Trains are walked in descending overall score (stable sort, so ties keep
/// their input order) and each takes the first branch it qualifies for:
/// service while under capacity and scoring >= 80, standby while under
/// capacity and scoring >= 60, IBL when scoring < 50 or carrying a job-card
/// sub-score < 40, cleaning otherwise. Nothing is left unassigned; the
/// cleaning branch is the catch-all.
///
/// When a zone's bay table is exhausted the first bay is reused. Known
/// quirk kept as observable behavior: duplicate bay labels are possible.
/// Routing a train into a zone whose bay table is empty (a custom layout
/// with no slots for IBL or cleaning) fails with [`OptimizationError::NoBaysConfigured`]
/// rather than panicking.
pub fn assign_zones(
    scored: &[ScoredTrain],
    layout: &YardLayout,
) -> Result<Vec<Assignment>, OptimizationError> {
    if scored.is_empty() {
        return Err(OptimizationError::EmptyFleet);
    }

    let mut ranked: Vec<&ScoredTrain> = scored.iter().collect();
    ranked.sort_by(|a, b| b.overall_score.cmp(&a.overall_score));

    let mut assignments = Vec::with_capacity(ranked.len());
    let mut service_count = 0usize;
    let mut standby_count = 0usize;
    let mut ibl_count = 0usize;
    let mut cleaning_count = 0usize;

    for train in ranked {
        let (zone, reasoning) = if train.overall_score >= 80
            && service_count < layout.capacity(Zone::Service)
        {
            (Zone::Service, "High score - optimal for revenue service")
        } else if train.overall_score >= 60 && standby_count < layout.capacity(Zone::Standby) {
            (Zone::Standby, "Good condition - suitable for standby duty")
        } else if train.overall_score < 50 || train.factors.job_card < 40.0 {
            (Zone::Ibl, "Low score or critical maintenance required")
        } else {
            (Zone::Cleaning, "Requires cleaning and detailing")
        };

        let occupied = match zone {
            Zone::Service => &mut service_count,
            Zone::Standby => &mut standby_count,
            Zone::Ibl => &mut ibl_count,
            Zone::Cleaning => &mut cleaning_count,
        };

        let slots = layout.slots(zone);
        let slot = slots
            .get(*occupied)
            .or_else(|| slots.first())
            .ok_or(OptimizationError::NoBaysConfigured { zone })?;

        assignments.push(Assignment {
            train_id: train.train_id.clone(),
            assigned_zone: zone,
            bay: slot.bay.to_string(),
            x: slot.x,
            y: slot.y,
            score: train.overall_score,
            reasoning: reasoning.to_string(),
            factors: FactorBreakdown::from_scores(&train.factors),
        });

        *occupied += 1;
    }

    Ok(assignments)
}
