//! Feature assembler: turns a request body into the classifier row.
//!
//! Missing fields are all reported at once rather than one at a time, so a
//! client can fix its payload in a single round trip.

use serde_json::Value;

use crate::domain::{FeatureRecord, FeatureVector, FEATURE_ORDER};

/// What to do with request fields outside the canonical set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraFields {
    #[default]
    Ignore,
    Reject,
}

/// Whether coded fields are checked against their domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueCheck {
    /// Numeric values reach the classifier as given.
    #[default]
    PassThrough,
    /// Flags must be 0/1 and categorical codes must be in range.
    Strict,
}

/// Errors raised while validating a request body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssemblyError {
    #[error("Request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("{}", missing_message(.0))]
    MissingFields(Vec<&'static str>),

    #[error("Field {field} must be a number, got {found}")]
    Type {
        field: &'static str,
        found: &'static str,
    },

    #[error("Unknown fields: {}", .0.join(", "))]
    UnknownFields(Vec<String>),

    #[error("Invalid field values: {}", .0.join("; "))]
    Validation(Vec<String>),
}

fn missing_message(fields: &[&'static str]) -> String {
    match fields {
        [one] => format!("Missing field: {one}"),
        many => format!("Missing fields: {}", many.join(", ")),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validates and orders raw input fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureAssembler {
    extra_fields: ExtraFields,
    value_check: ValueCheck,
}

impl FeatureAssembler {
    #[must_use]
    pub fn new(extra_fields: ExtraFields, value_check: ValueCheck) -> Self {
        Self {
            extra_fields,
            value_check,
        }
    }

    /// Build the named record and its canonical row from a request body.
    ///
    /// # Errors
    /// Returns `AssemblyError` naming every missing field, or the first
    /// field with a non-numeric value.
    pub fn assemble(&self, payload: &Value) -> Result<(FeatureRecord, FeatureVector), AssemblyError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| AssemblyError::NotAnObject(json_kind(payload)))?;

        let missing: Vec<&'static str> = FEATURE_ORDER
            .iter()
            .copied()
            .filter(|name| !obj.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(AssemblyError::MissingFields(missing));
        }

        let mut record = FeatureRecord::default();
        for name in FEATURE_ORDER {
            let raw = &obj[name];
            let value = match raw {
                Value::Number(n) => n.as_f64(),
                _ => None,
            }
            .ok_or(AssemblyError::Type {
                field: name,
                found: json_kind(raw),
            })?;
            if let Some(slot) = record.slot_mut(name) {
                *slot = value;
            }
        }

        if self.extra_fields == ExtraFields::Reject {
            let mut unknown: Vec<String> = obj
                .keys()
                .filter(|k| !FEATURE_ORDER.contains(&k.as_str()))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                unknown.sort();
                return Err(AssemblyError::UnknownFields(unknown));
            }
        }

        if self.value_check == ValueCheck::Strict {
            record.validate().map_err(AssemblyError::Validation)?;
        }

        tracing::debug!("Assembled feature row ({} values)", FEATURE_ORDER.len());
        let vector = record.to_vector();
        Ok((record, vector))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn valid_payload() -> Value {
        json!({
            "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233,
            "fbs": 1, "restecg": 0, "thalach": 150, "exang": 0,
            "oldpeak": 2.3, "slope": 0, "ca": 0, "thal": 1
        })
    }

    #[test]
    fn test_assemble_valid_payload() {
        let (record, vector) = FeatureAssembler::default()
            .assemble(&valid_payload())
            .expect("Should assemble");
        assert!((record.oldpeak - 2.3).abs() < f64::EPSILON);
        assert_eq!(vector.as_slice()[0], 63.0);
        assert_eq!(vector.as_slice()[12], 1.0);
    }

    #[test]
    fn test_round_trip_recovers_request_values() {
        let payload = valid_payload();
        let (_, vector) = FeatureAssembler::default()
            .assemble(&payload)
            .expect("Should assemble");
        let back = FeatureRecord::from_vector(&vector);
        for name in FEATURE_ORDER {
            assert_eq!(back.get(name), payload[name].as_f64(), "field {name}");
        }
    }

    #[test]
    fn test_each_missing_field_is_named() {
        for name in FEATURE_ORDER {
            let mut payload = valid_payload();
            payload.as_object_mut().expect("object").remove(name);
            let err = FeatureAssembler::default()
                .assemble(&payload)
                .expect_err("Should fail");
            assert_eq!(err, AssemblyError::MissingFields(vec![name]));
            assert_eq!(err.to_string(), format!("Missing field: {name}"));
        }
    }

    #[test]
    fn test_all_missing_fields_reported() {
        let err = FeatureAssembler::default()
            .assemble(&json!({"age": 50}))
            .expect_err("Should fail");
        match err {
            AssemblyError::MissingFields(fields) => {
                assert_eq!(fields.len(), FEATURE_ORDER.len() - 1);
                assert_eq!(fields[0], "sex");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let mut payload = valid_payload();
        payload["chol"] = json!("233");
        let err = FeatureAssembler::default()
            .assemble(&payload)
            .expect_err("Should fail");
        assert_eq!(
            err,
            AssemblyError::Type {
                field: "chol",
                found: "string"
            }
        );
    }

    #[test]
    fn test_non_object_rejected() {
        let err = FeatureAssembler::default()
            .assemble(&json!([1, 2, 3]))
            .expect_err("Should fail");
        assert_eq!(err, AssemblyError::NotAnObject("array"));
    }

    #[test]
    fn test_extra_fields_policy() {
        let mut payload = valid_payload();
        payload["patient_name"] = json!("x");

        assert!(FeatureAssembler::default().assemble(&payload).is_ok());

        let strict = FeatureAssembler::new(ExtraFields::Reject, ValueCheck::PassThrough);
        let err = strict.assemble(&payload).expect_err("Should fail");
        assert_eq!(err, AssemblyError::UnknownFields(vec!["patient_name".into()]));
    }

    #[test]
    fn test_value_check_policy() {
        let mut payload = valid_payload();
        payload["sex"] = json!(3);

        let (record, _) = FeatureAssembler::default()
            .assemble(&payload)
            .expect("Pass-through keeps value");
        assert_eq!(record.sex, 3.0);

        let strict = FeatureAssembler::new(ExtraFields::Ignore, ValueCheck::Strict);
        assert!(matches!(
            strict.assemble(&payload),
            Err(AssemblyError::Validation(_))
        ));
    }
}
