//! Rule-based advice derived from a prediction and the raw measurements.
//!
//! Rules are evaluated in a fixed order and their outputs concatenated.
//! The wellness fallback applies only when no other rule fired.

use super::{FeatureRecord, Outcome};

/// Age above which cardiovascular monitoring is advised.
pub const AGE_MONITORING_THRESHOLD: f64 = 50.0;

/// Resting blood pressure (mmHg) above which control is advised.
pub const BLOOD_PRESSURE_THRESHOLD: f64 = 140.0;

/// Serum cholesterol (mg/dL) above which control is advised.
pub const CHOLESTEROL_THRESHOLD: f64 = 240.0;

pub const REFERRAL_RECOMMENDATIONS: [&str; 2] = [
    "Consult a cardiologist",
    "Schedule further tests: ECG and echocardiogram",
];

pub const AGE_RECOMMENDATION: &str = "Monitor cardiovascular health regularly due to age";

pub const BLOOD_PRESSURE_RECOMMENDATION: &str =
    "Control blood pressure: reduce salt intake and exercise regularly";

pub const CHOLESTEROL_RECOMMENDATION: &str =
    "Control cholesterol: eat less saturated fat and stay active";

pub const WELLNESS_RECOMMENDATIONS: [&str; 2] = [
    "Maintain a healthy lifestyle",
    "Attend regular check-ups",
];

/// Build the recommendation list for one prediction.
///
/// Pure and order-stable: identical inputs always give identical lists.
#[must_use]
pub fn recommend(outcome: &Outcome, record: &FeatureRecord) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();

    if outcome.is_positive() {
        recs.extend(REFERRAL_RECOMMENDATIONS.iter().map(|s| (*s).to_string()));
    }
    if record.age > AGE_MONITORING_THRESHOLD {
        recs.push(AGE_RECOMMENDATION.to_string());
    }
    if record.trestbps > BLOOD_PRESSURE_THRESHOLD {
        recs.push(BLOOD_PRESSURE_RECOMMENDATION.to_string());
    }
    if record.chol > CHOLESTEROL_THRESHOLD {
        recs.push(CHOLESTEROL_RECOMMENDATION.to_string());
    }

    if recs.is_empty() {
        recs.extend(WELLNESS_RECOMMENDATIONS.iter().map(|s| (*s).to_string()));
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> FeatureRecord {
        FeatureRecord {
            age: 45.0,
            trestbps: 120.0,
            chol: 200.0,
            ..Default::default()
        }
    }

    fn outcome(prediction: u8, probability: f64) -> Outcome {
        Outcome {
            prediction,
            probability,
        }
    }

    #[test]
    fn test_fallback_when_no_rule_fires() {
        let recs = recommend(&outcome(0, 0.1), &healthy());
        assert_eq!(recs, WELLNESS_RECOMMENDATIONS.map(String::from).to_vec());
    }

    #[test]
    fn test_boundary_values_do_not_fire() {
        let record = FeatureRecord {
            age: 50.0,
            trestbps: 140.0,
            chol: 240.0,
            ..Default::default()
        };
        let recs = recommend(&outcome(0, 0.3), &record);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0], WELLNESS_RECOMMENDATIONS[0]);
    }

    #[test]
    fn test_positive_prediction_always_refers() {
        let record = FeatureRecord {
            age: 70.0,
            trestbps: 180.0,
            chol: 300.0,
            ..Default::default()
        };
        for r in [healthy(), record] {
            let recs = recommend(&outcome(1, 0.6), &r);
            assert_eq!(recs[0], REFERRAL_RECOMMENDATIONS[0]);
            assert_eq!(recs[1], REFERRAL_RECOMMENDATIONS[1]);
            assert!(!recs.iter().any(|s| s == WELLNESS_RECOMMENDATIONS[0]));
        }
    }

    #[test]
    fn test_rules_concatenate_in_fixed_order() {
        let record = FeatureRecord {
            age: 61.0,
            trestbps: 150.0,
            chol: 260.0,
            ..Default::default()
        };
        let recs = recommend(&outcome(1, 0.95), &record);
        assert_eq!(
            recs,
            vec![
                REFERRAL_RECOMMENDATIONS[0].to_string(),
                REFERRAL_RECOMMENDATIONS[1].to_string(),
                AGE_RECOMMENDATION.to_string(),
                BLOOD_PRESSURE_RECOMMENDATION.to_string(),
                CHOLESTEROL_RECOMMENDATION.to_string(),
            ]
        );
    }

    #[test]
    fn test_single_rule_suppresses_fallback() {
        let record = FeatureRecord {
            chol: 250.0,
            ..healthy()
        };
        let recs = recommend(&outcome(0, 0.2), &record);
        assert_eq!(recs, vec![CHOLESTEROL_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn test_deterministic() {
        let record = FeatureRecord {
            age: 55.0,
            ..healthy()
        };
        let o = outcome(1, 0.7);
        assert_eq!(recommend(&o, &record), recommend(&o, &record));
    }
}
