//! Prediction service: Orchestrates one request through the pipeline.
//!
//! Received -> Validated -> ModelChecked -> Inferred -> Enriched -> Responded.
//! Every transition can exit early with an error response; a response is
//! always either a complete result or a complete error object.

use std::sync::Arc;

use serde_json::{json, Value};

use super::{invoke, FeatureAssembler, ModelSlot};
use crate::config::ServiceConfig;
use crate::domain::{recommend, PredictionResult};
use crate::CardioError;

/// Shape of successful responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Prediction, probability, risk tier, timestamp and recommendations.
    #[default]
    Full,
    /// Prediction and probability only.
    Basic,
}

impl std::str::FromStr for ResponseMode {
    type Err = CardioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "basic" => Ok(Self::Basic),
            other => Err(CardioError::Config(format!(
                "Unknown response mode {other:?} (expected full or basic)"
            ))),
        }
    }
}

/// Status code plus JSON body, ready for any delivery mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: Value,
}

impl ServiceResponse {
    fn error(err: &CardioError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Service for running single-record predictions.
pub struct PredictionService {
    slot: Arc<ModelSlot>,
    assembler: FeatureAssembler,
    mode: ResponseMode,
}

impl PredictionService {
    /// Create a service over an injected model slot.
    #[must_use]
    pub fn new(slot: Arc<ModelSlot>, assembler: FeatureAssembler, mode: ResponseMode) -> Self {
        Self {
            slot,
            assembler,
            mode,
        }
    }

    #[must_use]
    pub fn from_config(slot: Arc<ModelSlot>, config: &ServiceConfig) -> Self {
        Self::new(slot, config.assembler(), config.response_mode)
    }

    /// Whether a model is loaded (triggers the lazy load if needed).
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.slot.handle().is_some()
    }

    /// Run the pipeline on a parsed request body.
    ///
    /// # Errors
    /// Returns `CardioError::Input` for invalid bodies,
    /// `CardioError::ModelUnavailable` when no model is loaded, and
    /// `CardioError::Inference` when the classifier fails.
    pub fn predict(&self, payload: &Value) -> Result<PredictionResult, CardioError> {
        tracing::debug!("Step 1: Validating request...");
        let (record, vector) = self.assembler.assemble(payload)?;

        tracing::debug!("Step 2: Checking model...");
        let handle = self.slot.handle().ok_or(CardioError::ModelUnavailable)?;

        tracing::debug!("Step 3: Invoking classifier...");
        let outcome = invoke(&handle, &vector)?;

        tracing::debug!("Step 4: Enriching result...");
        let result = match self.mode {
            ResponseMode::Full => {
                PredictionResult::enriched(outcome, recommend(&outcome, &record))
            }
            ResponseMode::Basic => PredictionResult::basic(outcome),
        };

        match result.risk_level() {
            Some(risk) => tracing::info!(
                "Prediction complete: prediction={}, probability={:.4}, risk={}",
                result.prediction,
                result.probability,
                risk
            ),
            None => tracing::info!(
                "Prediction complete: prediction={}, probability={:.4}",
                result.prediction,
                result.probability
            ),
        }

        Ok(result)
    }

    /// Run the pipeline and translate the outcome into a response.
    #[must_use]
    pub fn handle(&self, payload: &Value) -> ServiceResponse {
        let result = self.predict(payload).and_then(|r| {
            serde_json::to_value(r).map_err(CardioError::Serialization)
        });
        match result {
            Ok(body) => ServiceResponse { status: 200, body },
            Err(e) => {
                tracing::warn!("Prediction failed ({}): {}", e.status_code(), e);
                ServiceResponse::error(&e)
            }
        }
    }

    /// Parse a raw JSON body, then [`handle`](Self::handle) it.
    #[must_use]
    pub fn handle_json(&self, body: &str) -> ServiceResponse {
        match serde_json::from_str::<Value>(body) {
            Ok(payload) => self.handle(&payload),
            Err(e) => {
                let err = CardioError::InvalidBody(e);
                tracing::warn!("Rejected request body: {}", err);
                ServiceResponse::error(&err)
            }
        }
    }
}
