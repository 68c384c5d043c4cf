//! Loaded model handle: what the application sees of a resolved artifact.

use std::path::{Path, PathBuf};

use super::Classifier;
use crate::domain::StandardScaler;

/// A validated, loaded classifier artifact.
///
/// Immutable once built; shared read-only by every request.
pub struct ModelHandle {
    classifier: Box<dyn Classifier>,
    scaler: Option<StandardScaler>,
    feature_names: Vec<String>,
    source: PathBuf,
}

impl ModelHandle {
    /// Assemble a handle from its parts.
    ///
    /// Callers are responsible for having validated the parts against each
    /// other (see the artifact adapter).
    #[must_use]
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: Option<StandardScaler>,
        feature_names: Vec<String>,
        source: PathBuf,
    ) -> Self {
        Self {
            classifier,
            scaler,
            feature_names,
            source,
        }
    }

    #[must_use]
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    #[must_use]
    pub fn scaler(&self) -> Option<&StandardScaler> {
        self.scaler.as_ref()
    }

    /// Where the artifact was loaded from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("classifier", &self.classifier.name())
            .field("scaled", &self.scaler.is_some())
            .field("n_features", &self.feature_names.len())
            .field("source", &self.source)
            .finish()
    }
}
