//! Adapters layer: Concrete implementations of ports.
//!
//! - `estimators`: classifiers materialized from artifact parameters
//! - `artifact`: artifact codec, schema and integrity validation
//! - `loader`: candidate-location model resolution
//! - `sanitize`: redaction of clinical values in logs

pub mod artifact;
pub mod estimators;
pub mod loader;
pub mod sanitize;

pub use artifact::{ArtifactError, ArtifactFormat, ModelArtifact};
pub use loader::{AttemptOutcome, LoadAttempt, LoadReport, ModelLoader};
