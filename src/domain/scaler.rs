//! Optional standardization stage applied before classification.
//!
//! Present only when the artifact was trained on standardized inputs.

use serde::{Deserialize, Serialize};

/// Per-feature `(x - mean) / scale` transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check internal consistency against the expected feature count.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn check(&self, n_features: usize) -> Result<(), String> {
        if self.mean.len() != n_features || self.scale.len() != n_features {
            return Err(format!(
                "Scaler fitted on {}/{} features, expected {n_features}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err("Scaler parameters must be finite".into());
        }
        Ok(())
    }

    /// Standardize a row. A zero scale leaves the centered value unscaled.
    #[must_use]
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| {
                let s = if *s == 0.0 { 1.0 } else { *s };
                (x - m) / s
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler {
            mean: vec![10.0, 0.0],
            scale: vec![2.0, 0.0],
        };
        assert_eq!(scaler.transform(&[14.0, 3.0]), vec![2.0, 3.0]);
    }

    #[test]
    fn test_check_rejects_length_mismatch() {
        let scaler = StandardScaler {
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        };
        assert!(scaler.check(3).is_ok());
        assert!(scaler.check(13).is_err());
    }
}
