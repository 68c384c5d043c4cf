//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O. Everything here is
//! deterministic and safe to share across concurrent requests.

mod prediction;
pub mod recommendation;
mod record;
mod scaler;

pub use prediction::{
    Enrichment, Outcome, PredictionResult, RiskLevel, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD,
};
pub use recommendation::recommend;
pub use record::{FeatureRecord, FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
pub use scaler::StandardScaler;
