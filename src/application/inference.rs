//! Inference invoker: runs the loaded classifier on one assembled row.
//!
//! Performs:
//! 1. Capability check (probability output required)
//! 2. Optional standardization, when the artifact carries a scaler
//! 3. `predict` and `predict_proba` on a single row
//!
//! Classifier failures, including panics, come back as `InferenceError`
//! and never unwind into the caller.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::domain::{FeatureVector, Outcome};
use crate::ports::{ClassifierError, ModelHandle};

/// Errors raised while invoking the classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Model {0} does not support probability output")]
    Unsupported(String),

    #[error("{0}")]
    Failed(String),
}

impl From<ClassifierError> for InferenceError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::ProbabilityUnsupported(name) => Self::Unsupported(name),
            other => Self::Failed(other.to_string()),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "classifier panicked".to_string()
    }
}

/// Score exactly one row with the loaded model.
///
/// # Errors
/// Returns `InferenceError::Unsupported` for classifiers without
/// probability output, and `InferenceError::Failed` carrying the original
/// message for anything the classifier raises.
pub fn invoke(handle: &ModelHandle, vector: &FeatureVector) -> Result<Outcome, InferenceError> {
    let classifier = handle.classifier();
    if !classifier.supports_probability() {
        return Err(InferenceError::Unsupported(classifier.name().to_string()));
    }

    let scaled;
    let row: &[f64] = match handle.scaler() {
        Some(scaler) => {
            scaled = scaler.transform(vector.as_slice());
            &scaled
        }
        None => vector.as_slice(),
    };

    let scored = catch_unwind(AssertUnwindSafe(|| {
        let prediction = classifier.predict(row)?;
        let proba = classifier.predict_proba(row)?;
        Ok::<_, ClassifierError>((prediction, proba))
    }));

    let (prediction, proba) = match scored {
        Ok(result) => result?,
        Err(payload) => {
            let msg = panic_message(&*payload);
            tracing::error!("Classifier {} panicked: {}", classifier.name(), msg);
            return Err(InferenceError::Failed(msg));
        }
    };

    if prediction > 1 {
        return Err(InferenceError::Failed(format!(
            "Classifier returned non-binary label {prediction}"
        )));
    }
    let probability = proba[1];
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(InferenceError::Failed(format!(
            "Classifier returned invalid probability {probability}"
        )));
    }

    tracing::debug!(
        "Scored row with {}: prediction={}, probability={:.4}",
        classifier.name(),
        prediction,
        probability
    );

    Ok(Outcome {
        prediction,
        probability,
    })
}
