//! Induction planning engine for metro rail fleet operations.
//!
//! The crate turns per-train operational data (fitness certificates, job
//! cards, branding contracts, mileage, cleaning schedules, stabling
//! geometry, and IoT sensor readings) into a nightly induction plan: a
//! bounded readiness score per train, a yard zone and bay assignment for
//! the whole fleet, fleet-level metrics, and an operator-facing narrative.
//! Storage, authentication, and presentation belong to the caller; the
//! engine only consumes train records and returns plans.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
