//! Classifier port: Trait for the pre-trained binary predictor.
//!
//! This trait abstracts the trained artifact from the application logic.
//! Implementations must be deterministic: the same row always yields the
//! same output.

/// Errors raised by a classifier while predicting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("Feature count mismatch: got {got}, expected {expected}")]
    Shape { got: usize, expected: usize },

    #[error("Input value for feature {index} is not finite")]
    NonFinite { index: usize },

    #[error("{0} does not support probability estimates")]
    ProbabilityUnsupported(String),

    #[error("{0}")]
    Failed(String),
}

/// Binary classifier with a `predict` / `predict_proba` contract.
///
/// Rows are passed one at a time; there is no batching.
pub trait Classifier: Send + Sync {
    /// Short name of the estimator family (for diagnostics).
    fn name(&self) -> &str;

    /// Number of input features expected per row.
    fn n_features(&self) -> usize;

    /// Predict the class label (0 or 1) for one row.
    ///
    /// # Errors
    /// Returns `ClassifierError` if the row cannot be scored.
    fn predict(&self, row: &[f64]) -> Result<u8, ClassifierError>;

    /// Whether `predict_proba` is available.
    fn supports_probability(&self) -> bool {
        true
    }

    /// Class probabilities `[p(0), p(1)]` for one row.
    ///
    /// # Errors
    /// Returns `ClassifierError::ProbabilityUnsupported` for estimators
    /// without probability output.
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierError>;
}

/// Shared row check used by the concrete estimators.
///
/// # Errors
/// Returns `ClassifierError` on a length mismatch or non-finite value.
pub fn check_row(row: &[f64], expected: usize) -> Result<(), ClassifierError> {
    if row.len() != expected {
        return Err(ClassifierError::Shape {
            got: row.len(),
            expected,
        });
    }
    if let Some(index) = row.iter().position(|v| !v.is_finite()) {
        return Err(ClassifierError::NonFinite { index });
    }
    Ok(())
}
