//! # cardiorisk
//!
//! Heart disease risk inference service.
//!
//! This crate provides:
//! - Deterministic assembly of the 13 clinical features into the classifier row
//! - Resilient resolution of the trained artifact from ordered candidate locations
//! - Single-row classification with probability output
//! - Risk stratification and rule-based recommendations
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (FeatureRecord, RiskLevel, PredictionResult, rules)
//! - `ports`: The `Classifier` contract and the loaded `ModelHandle`
//! - `adapters`: Concrete estimators, artifact codec, model loader, log sanitizer
//! - `application`: Feature assembly, inference, model slot and the orchestrating service
//! - `config`: Environment-driven settings

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{PredictionService, ServiceResponse};
pub use config::ServiceConfig;
pub use domain::{FeatureRecord, PredictionResult, RiskLevel};

/// Result type for cardiorisk operations
pub type Result<T> = std::result::Result<T, CardioError>;

/// Main error type for cardiorisk
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error(transparent)]
    Input(#[from] application::AssemblyError),

    #[error("Model unavailable: no valid artifact could be loaded from the configured locations")]
    ModelUnavailable,

    #[error(transparent)]
    Inference(#[from] application::InferenceError),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CardioError {
    /// HTTP-equivalent status for this error.
    ///
    /// Input problems and classifier failures on a given row are client
    /// errors; a missing or incapable model is a server error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Input(_) | Self::InvalidBody(_) => 400,
            Self::Inference(application::InferenceError::Failed(_)) => 400,
            Self::Inference(application::InferenceError::Unsupported(_)) => 500,
            Self::ModelUnavailable | Self::Config(_) | Self::Io(_) | Self::Serialization(_) => 500,
        }
    }
}
