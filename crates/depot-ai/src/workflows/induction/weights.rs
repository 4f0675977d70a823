use serde::{Deserialize, Serialize};

use super::scoring::FactorScores;

/// Trust placed in sensor health relative to the six learnable factors.
/// Fixed by design: the learner only adjusts the eight-vector below.
pub const IOT_WEIGHT: f64 = 0.10;

/// Clamp band applied to each learnable weight before renormalization.
pub const MIN_WEIGHT: f64 = 0.05;
pub const MAX_WEIGHT: f64 = 0.40;

/// The eight-component weight vector driving score aggregation.
///
/// Invariant: components are non-negative and sum to 1 after any
/// adjustment. `energy` and `shunting` do not weight a sub-score directly;
/// they exist so the learner can express energy-side prediction error, and
/// they participate in normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationWeights {
    pub fitness: f64,
    pub job_card: f64,
    pub branding: f64,
    pub mileage: f64,
    pub cleaning: f64,
    pub geometry: f64,
    pub energy: f64,
    pub shunting: f64,
}

impl Default for OptimizationWeights {
    fn default() -> Self {
        Self {
            fitness: 0.20,
            job_card: 0.20,
            branding: 0.15,
            mileage: 0.15,
            cleaning: 0.10,
            geometry: 0.10,
            energy: 0.05,
            shunting: 0.05,
        }
    }
}

impl OptimizationWeights {
    /// Combines factor scores into the overall 0-100 readiness score.
    ///
    /// The IoT contribution always rides on the fixed [`IOT_WEIGHT`]; callers
    /// without sensor data feed the neutral 50 through `factors.iot`.
    pub fn aggregate(&self, factors: &FactorScores) -> u8 {
        let weighted = factors.fitness * self.fitness
            + factors.job_card * self.job_card
            + factors.branding * self.branding
            + factors.mileage * self.mileage
            + factors.cleaning * self.cleaning
            + factors.geometry * self.geometry
            + factors.iot * IOT_WEIGHT;

        weighted.clamp(0.0, 100.0).round() as u8
    }

    pub fn sum(&self) -> f64 {
        self.fitness
            + self.job_card
            + self.branding
            + self.mileage
            + self.cleaning
            + self.geometry
            + self.energy
            + self.shunting
    }

    /// Scales every component so the vector sums to exactly 1.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if total <= 0.0 {
            return Self::default();
        }

        Self {
            fitness: self.fitness / total,
            job_card: self.job_card / total,
            branding: self.branding / total,
            mileage: self.mileage / total,
            cleaning: self.cleaning / total,
            geometry: self.geometry / total,
            energy: self.energy / total,
            shunting: self.shunting / total,
        }
    }

    /// Clamps each component into the configured band.
    pub fn clamped(&self, min: f64, max: f64) -> Self {
        Self {
            fitness: self.fitness.clamp(min, max),
            job_card: self.job_card.clamp(min, max),
            branding: self.branding.clamp(min, max),
            mileage: self.mileage.clamp(min, max),
            cleaning: self.cleaning.clamp(min, max),
            geometry: self.geometry.clamp(min, max),
            energy: self.energy.clamp(min, max),
            shunting: self.shunting.clamp(min, max),
        }
    }
}

/// Named weight presets used when an operator requests a scenario instead
/// of the learned/default vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioPreset {
    PeakHourOptimization,
    MaintenanceWindow,
    EnergyOptimization,
    BrandingCompliance,
}

impl ScenarioPreset {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "peak-hour-optimization" => Some(Self::PeakHourOptimization),
            "maintenance-window" => Some(Self::MaintenanceWindow),
            "energy-optimization" => Some(Self::EnergyOptimization),
            "branding-compliance" => Some(Self::BrandingCompliance),
            _ => None,
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::PeakHourOptimization => "peak-hour-optimization",
            Self::MaintenanceWindow => "maintenance-window",
            Self::EnergyOptimization => "energy-optimization",
            Self::BrandingCompliance => "branding-compliance",
        }
    }

    pub fn weights(self) -> OptimizationWeights {
        match self {
            Self::PeakHourOptimization => OptimizationWeights {
                fitness: 0.25,
                job_card: 0.15,
                branding: 0.20,
                mileage: 0.15,
                cleaning: 0.05,
                geometry: 0.10,
                energy: 0.05,
                shunting: 0.05,
            },
            Self::MaintenanceWindow => OptimizationWeights {
                fitness: 0.15,
                job_card: 0.30,
                branding: 0.10,
                mileage: 0.15,
                cleaning: 0.15,
                geometry: 0.10,
                energy: 0.03,
                shunting: 0.02,
            },
            Self::EnergyOptimization => OptimizationWeights {
                fitness: 0.15,
                job_card: 0.15,
                branding: 0.10,
                mileage: 0.15,
                cleaning: 0.10,
                geometry: 0.15,
                energy: 0.15,
                shunting: 0.05,
            },
            Self::BrandingCompliance => OptimizationWeights {
                fitness: 0.15,
                job_card: 0.15,
                branding: 0.30,
                mileage: 0.15,
                cleaning: 0.10,
                geometry: 0.10,
                energy: 0.03,
                shunting: 0.02,
            },
        }
    }
}
