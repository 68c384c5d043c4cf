//! Service configuration from the environment.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `CARDIORISK_MODEL_PATHS` | candidate artifact locations, platform path-list, highest priority first |
//! | `CARDIORISK_REJECT_EXTRA_FIELDS` | reject unknown request fields instead of ignoring them |
//! | `CARDIORISK_STRICT_VALUES` | check flag and categorical codes against their domains |
//! | `CARDIORISK_RESPONSE_MODE` | `full` (default) or `basic` |
//! | `CARDIORISK_REQUIRE_ARTIFACT_DIGEST` | require a matching `<artifact>.sha256` sidecar |

use std::path::PathBuf;

use crate::adapters::ModelLoader;
use crate::application::{ExtraFields, FeatureAssembler, ResponseMode, ValueCheck};
use crate::CardioError;

pub const MODEL_PATHS_ENV: &str = "CARDIORISK_MODEL_PATHS";
pub const REJECT_EXTRA_FIELDS_ENV: &str = "CARDIORISK_REJECT_EXTRA_FIELDS";
pub const STRICT_VALUES_ENV: &str = "CARDIORISK_STRICT_VALUES";
pub const RESPONSE_MODE_ENV: &str = "CARDIORISK_RESPONSE_MODE";
pub const REQUIRE_DIGEST_ENV: &str = "CARDIORISK_REQUIRE_ARTIFACT_DIGEST";

fn parse_bool(v: &str) -> bool {
    matches!(v.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

/// Runtime settings for the prediction pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Candidate artifact locations, tried in order.
    pub model_paths: Vec<PathBuf>,
    pub extra_fields: ExtraFields,
    pub value_check: ValueCheck,
    pub response_mode: ResponseMode,
    pub require_digest: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_paths: ModelLoader::default_candidates(),
            extra_fields: ExtraFields::default(),
            value_check: ValueCheck::default(),
            response_mode: ResponseMode::default(),
            require_digest: false,
        }
    }
}

impl ServiceConfig {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `CardioError::Config` for unparseable values.
    pub fn from_env() -> Result<Self, CardioError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `CardioError::Config` for unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CardioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(paths) = lookup(MODEL_PATHS_ENV).filter(|v| !v.trim().is_empty()) {
            config.model_paths = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
        if lookup(REJECT_EXTRA_FIELDS_ENV).is_some_and(|v| parse_bool(&v)) {
            config.extra_fields = ExtraFields::Reject;
        }
        if lookup(STRICT_VALUES_ENV).is_some_and(|v| parse_bool(&v)) {
            config.value_check = ValueCheck::Strict;
        }
        if let Some(mode) = lookup(RESPONSE_MODE_ENV) {
            config.response_mode = mode.parse()?;
        }
        config.require_digest = lookup(REQUIRE_DIGEST_ENV).is_some_and(|v| parse_bool(&v));

        Ok(config)
    }

    #[must_use]
    pub fn loader(&self) -> ModelLoader {
        ModelLoader::new(self.model_paths.clone()).with_required_digest(self.require_digest)
    }

    #[must_use]
    pub fn assembler(&self) -> FeatureAssembler {
        FeatureAssembler::new(self.extra_fields, self.value_check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&[])).expect("Should parse");
        assert_eq!(config.extra_fields, ExtraFields::Ignore);
        assert_eq!(config.value_check, ValueCheck::PassThrough);
        assert_eq!(config.response_mode, ResponseMode::Full);
        assert!(!config.require_digest);
        assert!(!config.model_paths.is_empty());
    }

    #[test]
    fn test_overrides() {
        let paths = std::env::join_paths(["/opt/a.json", "/opt/b.bin"]).expect("join");
        let paths = paths.to_string_lossy().to_string();
        let config = ServiceConfig::from_lookup(lookup_from(&[
            (MODEL_PATHS_ENV, &paths),
            (REJECT_EXTRA_FIELDS_ENV, "true"),
            (STRICT_VALUES_ENV, "1"),
            (RESPONSE_MODE_ENV, "basic"),
            (REQUIRE_DIGEST_ENV, "yes"),
        ]))
        .expect("Should parse");

        assert_eq!(
            config.model_paths,
            vec![PathBuf::from("/opt/a.json"), PathBuf::from("/opt/b.bin")]
        );
        assert_eq!(config.extra_fields, ExtraFields::Reject);
        assert_eq!(config.value_check, ValueCheck::Strict);
        assert_eq!(config.response_mode, ResponseMode::Basic);
        assert!(config.require_digest);
        assert_eq!(config.loader().candidates().len(), 2);
    }

    #[test]
    fn test_invalid_response_mode() {
        let err = ServiceConfig::from_lookup(lookup_from(&[(RESPONSE_MODE_ENV, "verbose")]))
            .expect_err("Should reject");
        assert!(matches!(err, CardioError::Config(_)));
    }
}
