use chrono::{DateTime, Utc};

use super::domain::{
    BrandingPriority, FitnessCertificate, JobCardStatus, SensorReading, SensorStatus, Train,
};

/// The six independent readiness sub-scores plus the auxiliary IoT health
/// score, each clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScores {
    pub fitness: f64,
    pub job_card: f64,
    pub branding: f64,
    pub mileage: f64,
    pub cleaning: f64,
    pub geometry: f64,
    pub iot: f64,
}

/// Scores one train from its raw domain blocks. Pure: no block access goes
/// through storage and missing blocks default rather than fail.
pub fn score_train(train: &Train, sensors: &[SensorReading], now: DateTime<Utc>) -> FactorScores {
    FactorScores {
        fitness: fitness_score(train.fitness_certificate.as_ref(), now),
        job_card: job_card_score(train.job_card_status.as_ref()),
        branding: branding_score(train.branding_priority.as_ref()),
        mileage: passthrough_score(train.mileage_balancing.as_ref().map(|block| block.score)),
        cleaning: passthrough_score(train.cleaning_detailing.as_ref().map(|block| block.score)),
        geometry: passthrough_score(train.stabling_geometry.as_ref().map(|block| block.score)),
        iot: iot_score(sensors),
    }
}

/// Certificate scoring starts at 100 and applies independent deductions per
/// expired sub-certificate: 50 for rolling stock, 30 for signalling, 20 for
/// telecom.
///
/// Records without raw certificate windows only carry the pre-aggregated
/// `overall_score`; those pass through unchanged. This is the compatibility
/// path for historical data and the canonical path is the fresh computation.
fn fitness_score(certificate: Option<&FitnessCertificate>, now: DateTime<Utc>) -> f64 {
    let Some(certificate) = certificate else {
        return 100.0;
    };

    if !certificate.has_certificate_windows() {
        return f64::from(certificate.overall_score).clamp(0.0, 100.0);
    }

    let mut score: f64 = 100.0;
    if let Some(window) = &certificate.rolling_stock {
        if window.expiry_date < now {
            score -= 50.0;
        }
    }
    if let Some(window) = &certificate.signalling {
        if window.expiry_date < now {
            score -= 30.0;
        }
    }
    if let Some(window) = &certificate.telecom {
        if window.expiry_date < now {
            score -= 20.0;
        }
    }

    score.max(0.0)
}

fn job_card_score(status: Option<&JobCardStatus>) -> f64 {
    match status {
        None => 100.0,
        Some(status) if status.open_work_orders == 0 => 100.0,
        Some(status) => (100.0 - f64::from(status.open_work_orders) * 20.0).max(0.0),
    }
}

fn branding_score(branding: Option<&BrandingPriority>) -> f64 {
    let Some(branding) = branding else {
        return 100.0;
    };

    if branding.contract_hours <= 0.0 {
        return 0.0;
    }

    let completion = branding.completed_hours / branding.contract_hours * 100.0;
    completion.min(100.0).round()
}

/// Mileage, cleaning, and geometry arrive pre-aggregated by domain-specific
/// upstream logic; the engine only clamps and forwards the stored score.
fn passthrough_score(score: Option<u8>) -> f64 {
    match score {
        Some(score) => f64::from(score).clamp(0.0, 100.0),
        None => 100.0,
    }
}

fn iot_score(sensors: &[SensorReading]) -> f64 {
    if sensors.is_empty() {
        // Neutral when nothing reported in the lookback window.
        return 50.0;
    }

    let total: f64 = sensors
        .iter()
        .map(|reading| match reading.status {
            SensorStatus::Normal => 100.0,
            SensorStatus::Warning => 60.0,
            SensorStatus::Critical => 20.0,
        })
        .sum();

    (total / sensors.len() as f64).round()
}
