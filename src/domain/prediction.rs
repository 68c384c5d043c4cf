//! Prediction result types.
//!
//! Represents the output of the heart disease classifier after risk
//! stratification.

use serde::Serialize;

/// Probability at or above which a patient is classified as high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.85;

/// Probability at or above which a patient is classified as medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Risk tier for heart disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    /// Low risk of heart disease
    Low,
    /// Medium risk, monitoring recommended
    Medium,
    /// High risk, specialist consultation advised
    High,
}

impl RiskLevel {
    /// Map a positive-class probability to a tier.
    ///
    /// Thresholds are inclusive on their lower bound, so 0.85 is `High`
    /// and 0.4 is `Medium`.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Raw classifier output for one row (before interpretation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// Binary prediction (0 = no disease, 1 = disease present)
    pub prediction: u8,

    /// Probability of the positive class (0.0 to 1.0)
    pub probability: f64,
}

impl Outcome {
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.prediction == 1
    }
}

/// Risk tier, timestamp and advice attached to an outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrichment {
    pub risk_level: RiskLevel,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub recommendations: Vec<String>,
}

/// Response body of a successful prediction.
///
/// Built once per request and never mutated afterwards. In the basic
/// response mode `enrichment` is absent and only the prediction and
/// probability are emitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub prediction: u8,
    pub probability: f64,
    #[serde(flatten)]
    pub enrichment: Option<Enrichment>,
}

impl PredictionResult {
    /// Result carrying only the classifier output.
    #[must_use]
    pub fn basic(outcome: Outcome) -> Self {
        Self {
            prediction: outcome.prediction,
            probability: outcome.probability,
            enrichment: None,
        }
    }

    /// Result with risk tier and recommendations, stamped now.
    #[must_use]
    pub fn enriched(outcome: Outcome, recommendations: Vec<String>) -> Self {
        Self {
            prediction: outcome.prediction,
            probability: outcome.probability,
            enrichment: Some(Enrichment {
                risk_level: RiskLevel::from_probability(outcome.probability),
                timestamp: chrono::Utc::now(),
                recommendations,
            }),
        }
    }

    #[must_use]
    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.enrichment.as_ref().map(|e| e.risk_level)
    }
}
