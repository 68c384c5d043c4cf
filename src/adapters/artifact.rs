//! Model artifact codec and load-time validation.
//!
//! An artifact is a serialized [`ModelArtifact`], either JSON (`.json`) or
//! bincode (`.bin`). It embeds the feature order it was trained with, and
//! loading fails closed if that order differs from [`FEATURE_ORDER`].
//!
//! # Integrity
//!
//! An optional sidecar `<artifact>.sha256` holds the hex SHA-256 of the
//! artifact bytes. When present it must match; when
//! `CARDIORISK_REQUIRE_ARTIFACT_DIGEST=true` it must also exist.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::estimators::EstimatorSpec;
use crate::domain::{StandardScaler, FEATURE_ORDER};
use crate::ports::ModelHandle;

/// Artifact schema version understood by this build.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

/// Suffix appended to the artifact file name for the digest sidecar.
pub const DIGEST_SUFFIX: &str = "sha256";

/// Errors raised while reading or validating an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode artifact: {0}")]
    Decode(String),

    #[error("Artifact schema mismatch: {0}")]
    Schema(String),

    #[error("Artifact integrity check failed: {0}")]
    Integrity(String),
}

/// Encoding of an artifact file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Bincode,
}

impl ArtifactFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("bin") => Self::Bincode,
            _ => Self::Json,
        }
    }
}

/// On-disk artifact layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub model: EstimatorSpec,
}

impl ModelArtifact {
    /// Decode an artifact from raw bytes.
    ///
    /// # Errors
    /// Returns `ArtifactError::Decode` if the bytes are not a valid artifact.
    pub fn decode(bytes: &[u8], format: ArtifactFormat) -> Result<Self, ArtifactError> {
        match format {
            ArtifactFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| ArtifactError::Decode(e.to_string()))
            }
            ArtifactFormat::Bincode => {
                bincode::deserialize(bytes).map_err(|e| ArtifactError::Decode(e.to_string()))
            }
        }
    }

    /// Encode the artifact.
    ///
    /// # Errors
    /// Returns `ArtifactError::Decode` if serialization fails.
    pub fn encode(&self, format: ArtifactFormat) -> Result<Vec<u8>, ArtifactError> {
        match format {
            ArtifactFormat::Json => {
                serde_json::to_vec_pretty(self).map_err(|e| ArtifactError::Decode(e.to_string()))
            }
            ArtifactFormat::Bincode => {
                bincode::serialize(self).map_err(|e| ArtifactError::Decode(e.to_string()))
            }
        }
    }

    /// Check the artifact was trained on the canonical feature order.
    ///
    /// # Errors
    /// Returns `ArtifactError::Schema` describing the first divergence.
    pub fn check_schema(&self) -> Result<(), ArtifactError> {
        if self.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(ArtifactError::Schema(format!(
                "Unsupported schema_version {} (expected {ARTIFACT_SCHEMA_VERSION})",
                self.schema_version
            )));
        }
        if self.feature_names.len() != FEATURE_ORDER.len() {
            return Err(ArtifactError::Schema(format!(
                "Artifact expects {} features, service provides {}",
                self.feature_names.len(),
                FEATURE_ORDER.len()
            )));
        }
        for (i, (got, want)) in self.feature_names.iter().zip(FEATURE_ORDER).enumerate() {
            if got != want {
                return Err(ArtifactError::Schema(format!(
                    "Feature {i} is {got:?} in artifact but {want:?} in service"
                )));
            }
        }
        Ok(())
    }

    /// Validate and turn the artifact into a ready handle.
    ///
    /// # Errors
    /// Returns `ArtifactError::Schema` on any structural inconsistency.
    pub fn into_handle(self, source: PathBuf) -> Result<ModelHandle, ArtifactError> {
        self.check_schema()?;
        let n = self.feature_names.len();

        if let Some(scaler) = &self.scaler {
            scaler.check(n).map_err(ArtifactError::Schema)?;
        }
        let classifier = self.model.build(n).map_err(ArtifactError::Schema)?;

        Ok(ModelHandle::new(
            classifier,
            self.scaler,
            self.feature_names,
            source,
        ))
    }
}

/// Hex-encoded SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Path of the digest sidecar for an artifact.
#[must_use]
pub fn digest_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_owned();
    name.push(".");
    name.push(DIGEST_SUFFIX);
    PathBuf::from(name)
}

/// Verify artifact bytes against the sidecar digest, if any.
///
/// # Errors
/// Returns `ArtifactError::Integrity` on mismatch, or when `required` and the
/// sidecar is missing.
pub fn verify_digest(artifact: &Path, bytes: &[u8], required: bool) -> Result<(), ArtifactError> {
    let sidecar = digest_path(artifact);
    let expected = match std::fs::read_to_string(&sidecar) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                return Err(ArtifactError::Integrity(format!(
                    "Digest sidecar {sidecar:?} is required but missing"
                )));
            }
            return Ok(());
        }
        Err(e) => {
            return Err(ArtifactError::Integrity(format!(
                "Failed to read digest sidecar {sidecar:?}: {e}"
            )))
        }
    };

    // Accept `sha256sum` output ("<hex>  <file>") as well as a bare digest.
    let expected = expected
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let actual = sha256_hex(bytes);
    if !constant_time_eq_str(&actual, &expected) {
        return Err(ArtifactError::Integrity(format!(
            "SHA-256 mismatch for {artifact:?}"
        )));
    }
    tracing::debug!("Artifact digest verified for {:?}", artifact);
    Ok(())
}

// Constant-time compare for ASCII hex digests.
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
