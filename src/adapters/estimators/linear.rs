//! Linear estimators: logistic regression and a linear SVM.

use serde::{Deserialize, Serialize};

use crate::ports::{check_row, Classifier, ClassifierError};

/// Weights of a linear decision function `w · x + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearParams {
    pub(crate) fn check(&self, n_features: usize) -> Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "Model has {} coefficients, expected {n_features}",
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("Linear model parameters must be finite".into());
        }
        Ok(())
    }

    fn decision(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Binary logistic regression.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    params: LinearParams,
}

impl LogisticRegression {
    #[must_use]
    pub fn new(params: LinearParams) -> Self {
        Self { params }
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.params.coefficients.len()
    }

    fn predict(&self, row: &[f64]) -> Result<u8, ClassifierError> {
        check_row(row, self.n_features())?;
        Ok(u8::from(self.params.decision(row) > 0.0))
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierError> {
        check_row(row, self.n_features())?;
        let p = sigmoid(self.params.decision(row));
        Ok([1.0 - p, p])
    }
}

/// Linear support vector classifier. Has no probability output.
#[derive(Debug, Clone)]
pub struct LinearSvm {
    params: LinearParams,
}

impl LinearSvm {
    #[must_use]
    pub fn new(params: LinearParams) -> Self {
        Self { params }
    }
}

impl Classifier for LinearSvm {
    fn name(&self) -> &str {
        "linear_svm"
    }

    fn n_features(&self) -> usize {
        self.params.coefficients.len()
    }

    fn predict(&self, row: &[f64]) -> Result<u8, ClassifierError> {
        check_row(row, self.n_features())?;
        Ok(u8::from(self.params.decision(row) > 0.0))
    }

    fn supports_probability(&self) -> bool {
        false
    }

    fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], ClassifierError> {
        Err(ClassifierError::ProbabilityUnsupported(self.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LinearParams {
        LinearParams {
            coefficients: vec![1.0, -2.0],
            intercept: 0.5,
        }
    }

    #[test]
    fn test_logistic_probabilities_sum_to_one() {
        let model = LogisticRegression::new(params());
        let [p0, p1] = model.predict_proba(&[1.0, 0.0]).expect("Should score");
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
        // z = 1.5
        assert!((p1 - 1.0 / (1.0 + (-1.5f64).exp())).abs() < 1e-12);
        assert_eq!(model.predict(&[1.0, 0.0]).expect("Should predict"), 1);
        assert_eq!(model.predict(&[0.0, 1.0]).expect("Should predict"), 0);
    }

    #[test]
    fn test_sigmoid_is_stable_for_large_inputs() {
        assert!((sigmoid(-800.0)).abs() < 1e-300);
        assert!((sigmoid(800.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let model = LogisticRegression::new(params());
        let err = model.predict_proba(&[1.0]).expect_err("Should reject");
        assert_eq!(err, ClassifierError::Shape { got: 1, expected: 2 });
    }

    #[test]
    fn test_svm_has_no_probabilities() {
        let model = LinearSvm::new(params());
        assert!(!model.supports_probability());
        assert!(matches!(
            model.predict_proba(&[1.0, 0.0]),
            Err(ClassifierError::ProbabilityUnsupported(_))
        ));
        assert_eq!(model.predict(&[1.0, 0.0]).expect("Should predict"), 1);
    }

    #[test]
    fn test_check_params() {
        assert!(params().check(2).is_ok());
        assert!(params().check(13).is_err());
        let bad = LinearParams {
            coefficients: vec![f64::NAN, 0.0],
            intercept: 0.0,
        };
        assert!(bad.check(2).is_err());
    }
}
