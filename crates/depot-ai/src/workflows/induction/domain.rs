use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for fleet vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainId(pub String);

impl TrainId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One fleet vehicle with the six domain blocks feeding induction scoring.
///
/// Each block is owned and refreshed by a different back-office process, so
/// any of them can be absent on a given night. The scorer substitutes
/// neutral-or-maximal defaults instead of failing (upstream feeds are known
/// to be incomplete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Train {
    pub train_id: TrainId,
    pub name: String,
    pub status: TrainStatus,
    pub position: YardPosition,
    #[serde(default)]
    pub fitness_certificate: Option<FitnessCertificate>,
    #[serde(default)]
    pub job_card_status: Option<JobCardStatus>,
    #[serde(default)]
    pub branding_priority: Option<BrandingPriority>,
    #[serde(default)]
    pub mileage_balancing: Option<MileageBalancing>,
    #[serde(default)]
    pub cleaning_detailing: Option<CleaningDetailing>,
    #[serde(default)]
    pub stabling_geometry: Option<StablingGeometry>,
    #[serde(default)]
    pub overall_score: u8,
    #[serde(default)]
    pub last_optimized: Option<DateTime<Utc>>,
}

/// Operational status reported by the depot control system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainStatus {
    Running,
    Standby,
    Maintenance,
    Inspection,
}

impl TrainStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TrainStatus::Running => "running",
            TrainStatus::Standby => "standby",
            TrainStatus::Maintenance => "maintenance",
            TrainStatus::Inspection => "inspection",
        }
    }
}

/// Physical placement of a train inside the stabling yard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YardPosition {
    pub zone: Zone,
    pub bay: String,
    pub x: f64,
    pub y: f64,
}

/// One of the four yard areas a train can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Service,
    Standby,
    Ibl,
    Cleaning,
}

impl Zone {
    pub const fn label(self) -> &'static str {
        match self {
            Zone::Service => "service",
            Zone::Standby => "standby",
            Zone::Ibl => "ibl",
            Zone::Cleaning => "cleaning",
        }
    }
}

/// One of the three statutory sub-certificates, with its validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateWindow {
    pub valid: bool,
    pub expiry_date: DateTime<Utc>,
    pub score: u8,
}

/// Fitness certificate block covering rolling stock, signalling, and telecom.
///
/// Two data shapes arrive from upstream: freshly-synced records carry the
/// three sub-certificates, while historical records only carry the
/// pre-aggregated `overall_score`. The scorer handles both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessCertificate {
    #[serde(default)]
    pub rolling_stock: Option<CertificateWindow>,
    #[serde(default)]
    pub signalling: Option<CertificateWindow>,
    #[serde(default)]
    pub telecom: Option<CertificateWindow>,
    #[serde(default)]
    pub overall_score: u8,
}

impl FitnessCertificate {
    /// Whether any raw certificate window is available for fresh scoring.
    pub fn has_certificate_windows(&self) -> bool {
        self.rolling_stock.is_some() || self.signalling.is_some() || self.telecom.is_some()
    }
}

/// Maintenance work-order snapshot from the maximo-style job card feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobCardStatus {
    pub open_work_orders: u32,
    #[serde(default)]
    pub closed_work_orders: u32,
    #[serde(default)]
    pub critical_issues: Vec<String>,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub score: u8,
}

/// Advertising contract exposure data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandingPriority {
    pub advertiser: String,
    pub contract_hours: f64,
    pub completed_hours: f64,
    #[serde(default)]
    pub priority: BrandingTier,
    #[serde(default)]
    pub sla_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub score: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandingTier {
    High,
    #[default]
    Medium,
    Low,
}

/// Mileage and component-wear snapshot, pre-scored upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MileageBalancing {
    pub current_mileage: f64,
    pub target_mileage: f64,
    #[serde(default)]
    pub bogie_wear: f64,
    #[serde(default)]
    pub brake_pad_wear: f64,
    #[serde(default)]
    pub hvac_wear: f64,
    pub score: u8,
}

/// Cleaning schedule block, pre-scored upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningDetailing {
    #[serde(default)]
    pub last_deep_clean: Option<NaiveDate>,
    #[serde(default)]
    pub next_scheduled: Option<NaiveDate>,
    #[serde(default)]
    pub bay_occupied: bool,
    #[serde(default)]
    pub manpower_available: bool,
    pub score: u8,
}

/// Stabling geometry block: where the train sits versus where it should.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StablingGeometry {
    pub current_bay: String,
    pub optimal_bay: String,
    pub shunting_distance: f64,
    #[serde(default)]
    pub turn_out_time_minutes: f64,
    pub score: u8,
}

/// A single time-stamped IoT reading for one train.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub train_id: TrainId,
    pub kind: SensorKind,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    pub status: SensorStatus,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Vibration,
    Energy,
    Door,
    Braking,
    Temperature,
    Humidity,
}

/// Health tag attached to a reading by the telemetry gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    Normal,
    Warning,
    Critical,
}
