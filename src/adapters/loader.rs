//! Model loader: resolves the classifier artifact from candidate locations.
//!
//! Candidates are tried strictly in order; the first one that reads,
//! decodes and validates wins. Every attempt is recorded so deployments can
//! see which locations were probed and why each one was rejected.

use std::fmt;
use std::path::{Path, PathBuf};

use super::artifact::{verify_digest, ArtifactError, ArtifactFormat, ModelArtifact};
use crate::ports::ModelHandle;

/// Artifact file name used for directory candidates and defaults.
pub const DEFAULT_ARTIFACT_NAME: &str = "heart_model.json";

/// Subdirectory conventionally holding the artifact.
pub const DEFAULT_MODEL_DIR: &str = "ml_model";

/// How a single candidate location turned out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Loaded,
    NotFound,
    Unreadable(String),
    Corrupt(String),
    SchemaMismatch(String),
    IntegrityFailure(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::NotFound => write!(f, "not found"),
            Self::Unreadable(e) => write!(f, "unreadable: {e}"),
            Self::Corrupt(e) => write!(f, "corrupt: {e}"),
            Self::SchemaMismatch(e) => write!(f, "schema mismatch: {e}"),
            Self::IntegrityFailure(e) => write!(f, "integrity failure: {e}"),
        }
    }
}

impl From<&ArtifactError> for AttemptOutcome {
    fn from(err: &ArtifactError) -> Self {
        match err {
            ArtifactError::NotFound(_) => Self::NotFound,
            ArtifactError::Io { .. } => Self::Unreadable(err.to_string()),
            ArtifactError::Decode(_) => Self::Corrupt(err.to_string()),
            ArtifactError::Schema(e) => Self::SchemaMismatch(e.clone()),
            ArtifactError::Integrity(e) => Self::IntegrityFailure(e.clone()),
        }
    }
}

/// One probed location and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadAttempt {
    pub path: PathBuf,
    pub outcome: AttemptOutcome,
}

/// Result of running the candidate sequence once.
#[derive(Debug)]
pub struct LoadReport {
    pub attempts: Vec<LoadAttempt>,
    pub handle: Option<ModelHandle>,
}

impl LoadReport {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }
}

/// Loader over an ordered list of candidate artifact locations.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    candidates: Vec<PathBuf>,
    require_digest: bool,
}

impl ModelLoader {
    /// Create a loader over explicit candidates (highest priority first).
    #[must_use]
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            require_digest: false,
        }
    }

    /// Require a matching digest sidecar for every candidate.
    #[must_use]
    pub fn with_required_digest(mut self, required: bool) -> Self {
        self.require_digest = required;
        self
    }

    #[must_use]
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Default candidates: next to the executable first, then the working
    /// directory, so both installed and in-tree layouts resolve.
    #[must_use]
    pub fn default_candidates() -> Vec<PathBuf> {
        let mut out = Vec::new();

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
        {
            out.push(exe_dir.join(DEFAULT_MODEL_DIR).join(DEFAULT_ARTIFACT_NAME));
            out.push(exe_dir.join(DEFAULT_ARTIFACT_NAME));
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        out.push(cwd.join(DEFAULT_MODEL_DIR).join(DEFAULT_ARTIFACT_NAME));
        out.push(cwd.join(DEFAULT_ARTIFACT_NAME));
        out.push(cwd.join("models").join(DEFAULT_ARTIFACT_NAME));

        out.dedup();
        out
    }

    /// Try every candidate in order and stop at the first success.
    ///
    /// Never fails: exhaustion is reported as a `LoadReport` without a handle.
    pub fn load(&self) -> LoadReport {
        let mut attempts = Vec::with_capacity(self.candidates.len());

        for candidate in &self.candidates {
            let path = Self::resolve(candidate);
            match self.load_one(&path) {
                Ok(handle) => {
                    tracing::info!(
                        "Loaded {} model from {:?} (scaled={})",
                        handle.classifier().name(),
                        path,
                        handle.scaler().is_some()
                    );
                    attempts.push(LoadAttempt {
                        path,
                        outcome: AttemptOutcome::Loaded,
                    });
                    return LoadReport {
                        attempts,
                        handle: Some(handle),
                    };
                }
                Err(e) => {
                    let outcome = AttemptOutcome::from(&e);
                    match outcome {
                        AttemptOutcome::NotFound => {
                            tracing::debug!("No artifact at {:?}", path);
                        }
                        _ => tracing::warn!("Rejected artifact at {:?}: {}", path, e),
                    }
                    attempts.push(LoadAttempt { path, outcome });
                }
            }
        }

        tracing::error!(
            "Model unavailable: none of {} candidate locations yielded a valid artifact",
            attempts.len()
        );
        LoadReport {
            attempts,
            handle: None,
        }
    }

    /// Directory candidates point at the default artifact inside them.
    fn resolve(candidate: &Path) -> PathBuf {
        if candidate.is_dir() {
            candidate.join(DEFAULT_ARTIFACT_NAME)
        } else {
            candidate.to_path_buf()
        }
    }

    fn load_one(&self, path: &Path) -> Result<ModelHandle, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::NotFound(path.to_path_buf())
            } else {
                ArtifactError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        verify_digest(path, &bytes, self.require_digest)?;

        let artifact = ModelArtifact::decode(&bytes, ArtifactFormat::from_path(path))?;
        artifact.into_handle(path.to_path_buf())
    }
}
