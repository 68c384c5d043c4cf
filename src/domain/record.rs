//! Clinical feature record for heart disease prediction.
//!
//! Based on the 13 attributes of the UCI Cleveland heart disease dataset.
//!
//! # Deployment invariant
//!
//! [`FEATURE_ORDER`] must match the column order the classifier artifact was
//! trained with. Artifacts carry their own `feature_names` and the loader
//! refuses any artifact whose order differs from this one.

use serde::{Deserialize, Serialize};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 13;

/// Canonical feature order, shared by training and serving.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Clinical measurements for a single patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureRecord {
    /// Age in years
    pub age: f64,

    /// Sex: 1 = male, 0 = female
    pub sex: f64,

    /// Chest pain type (0-3)
    pub cp: f64,

    /// Resting blood pressure in mmHg
    pub trestbps: f64,

    /// Serum cholesterol in mg/dL
    pub chol: f64,

    /// Fasting blood sugar > 120 mg/dL: 1 = true, 0 = false
    pub fbs: f64,

    /// Resting electrocardiographic result (0-2)
    pub restecg: f64,

    /// Maximum heart rate achieved
    pub thalach: f64,

    /// Exercise induced angina: 1 = yes, 0 = no
    pub exang: f64,

    /// ST depression induced by exercise relative to rest
    pub oldpeak: f64,

    /// Slope of the peak exercise ST segment (0-2)
    pub slope: f64,

    /// Number of major vessels colored by fluoroscopy (0-4)
    pub ca: f64,

    /// Thalassemia code (0-3)
    pub thal: f64,
}

/// Ordered numeric row handed to the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FeatureRecord {
    /// Look up a feature by its canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        let v = match name {
            "age" => self.age,
            "sex" => self.sex,
            "cp" => self.cp,
            "trestbps" => self.trestbps,
            "chol" => self.chol,
            "fbs" => self.fbs,
            "restecg" => self.restecg,
            "thalach" => self.thalach,
            "exang" => self.exang,
            "oldpeak" => self.oldpeak,
            "slope" => self.slope,
            "ca" => self.ca,
            "thal" => self.thal,
            _ => return None,
        };
        Some(v)
    }

    /// Mutable access by canonical name, used while assembling from a request.
    pub(crate) fn slot_mut(&mut self, name: &str) -> Option<&mut f64> {
        let slot = match name {
            "age" => &mut self.age,
            "sex" => &mut self.sex,
            "cp" => &mut self.cp,
            "trestbps" => &mut self.trestbps,
            "chol" => &mut self.chol,
            "fbs" => &mut self.fbs,
            "restecg" => &mut self.restecg,
            "thalach" => &mut self.thalach,
            "exang" => &mut self.exang,
            "oldpeak" => &mut self.oldpeak,
            "slope" => &mut self.slope,
            "ca" => &mut self.ca,
            "thal" => &mut self.thal,
            _ => return None,
        };
        Some(slot)
    }

    /// Convert to the classifier row, in [`FEATURE_ORDER`].
    #[must_use]
    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector(vec![
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ])
    }

    /// Rebuild the named record from a canonical row.
    #[must_use]
    pub fn from_vector(v: &FeatureVector) -> Self {
        let v = v.as_slice();
        Self {
            age: v[0],
            sex: v[1],
            cp: v[2],
            trestbps: v[3],
            chol: v[4],
            fbs: v[5],
            restecg: v[6],
            thalach: v[7],
            exang: v[8],
            oldpeak: v[9],
            slope: v[10],
            ca: v[11],
            thal: v[12],
        }
    }

    /// Check flag and categorical fields against their coded domains.
    ///
    /// Continuous measurements are only required to be finite; no clamping
    /// is ever applied.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for name in FEATURE_ORDER {
            if let Some(v) = self.get(name) {
                if !v.is_finite() {
                    errors.push(format!("Field {name} must be a finite number"));
                }
            }
        }

        for (name, v) in [("sex", self.sex), ("fbs", self.fbs), ("exang", self.exang)] {
            if v != 0.0 && v != 1.0 {
                errors.push(format!("Field {name} must be 0 or 1, got {v}"));
            }
        }

        for (name, v, max) in [
            ("cp", self.cp, 3.0),
            ("restecg", self.restecg, 2.0),
            ("slope", self.slope, 2.0),
            ("ca", self.ca, 4.0),
            ("thal", self.thal, 3.0),
        ] {
            if v.fract() != 0.0 || !(0.0..=max).contains(&v) {
                errors.push(format!(
                    "Field {name} must be an integer code in [0, {max}], got {v}"
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureRecord {
        FeatureRecord {
            age: 63.0,
            sex: 1.0,
            cp: 3.0,
            trestbps: 145.0,
            chol: 233.0,
            fbs: 1.0,
            restecg: 0.0,
            thalach: 150.0,
            exang: 0.0,
            oldpeak: 2.3,
            slope: 0.0,
            ca: 0.0,
            thal: 1.0,
        }
    }

    #[test]
    fn test_to_vector_follows_canonical_order() {
        let record = sample();
        let vector = record.to_vector();
        assert_eq!(vector.len(), FEATURE_COUNT);
        for (i, name) in FEATURE_ORDER.iter().enumerate() {
            assert_eq!(Some(vector.as_slice()[i]), record.get(name), "field {name}");
        }
    }

    #[test]
    fn test_vector_round_trip_recovers_record() {
        let record = sample();
        let back = FeatureRecord::from_vector(&record.to_vector());
        assert_eq!(back, record);
    }

    #[test]
    fn test_unknown_name_has_no_value() {
        assert_eq!(sample().get("bmi"), None);
    }

    #[test]
    fn test_validation() {
        assert!(sample().validate().is_ok());

        let invalid = FeatureRecord {
            sex: 2.0,
            cp: 1.5,
            ca: 7.0,
            ..sample()
        };
        let errors = invalid.validate().expect_err("Should reject codes");
        assert_eq!(errors.len(), 3);
    }
}
