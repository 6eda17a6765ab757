//! Persisted per-restaurant onboarding record.
//!
//! Stored as a JSON object in the `onboarding_records` table. Each step with a
//! historical domain keeps its saved form data under its own key
//! (`personnelData`, `stripeData`, ...). `currentStep` and `completedSteps`
//! let a reopened flow restore its progress. Unknown keys are kept verbatim.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RecordError;

use super::steps::{self, WELCOME_STEP};

/// Parsed onboarding record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRecord {
    pub current_step: u8,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub completed_steps: BTreeSet<u8>,
    /// Step sub-objects and any other keys, flattened into the top level.
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

impl OnboardingRecord {
    /// Parse a raw JSON record.
    ///
    /// Only structural problems are errors. An out-of-range `currentStep`
    /// falls back to the welcome sentinel and unknown ids are dropped from
    /// `completedSteps`.
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(RecordError::NotAnObject {
                    found: json_kind(&other),
                });
            }
        };

        let current_step = map
            .remove("currentStep")
            .as_ref()
            .and_then(step_id_from_value)
            .unwrap_or(WELCOME_STEP);

        let completed_steps = match map.remove("completedSteps") {
            Some(Value::Array(items)) => items.iter().filter_map(step_id_from_value).collect(),
            _ => BTreeSet::new(),
        };

        Ok(Self {
            current_step,
            completed_steps,
            sections: map,
        })
    }

    /// Serialize back into the stored JSON text.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Raw sub-object stored under `key`.
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.sections.get(key)
    }

    /// Replace the sub-object stored under `key`.
    pub fn set_section(&mut self, key: impl Into<String>, data: Value) {
        self.sections.insert(key.into(), data);
    }

    /// Whether the record holds saved data for `step_id`'s domain.
    ///
    /// Presence is judged by truthiness only, so an empty object `{}` counts
    /// as saved. Steps without a historical domain never have data.
    pub fn has_data_for(&self, step_id: u8) -> bool {
        steps::step(step_id)
            .and_then(|s| s.record_key())
            .and_then(|key| self.section(key))
            .is_some_and(is_truthy)
    }
}

fn step_id_from_value(value: &Value) -> Option<u8> {
    let id = u8::try_from(value.as_u64()?).ok()?;
    steps::step(id).map(|s| s.id)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_sections_and_progress() {
        let record = OnboardingRecord::parse(
            r#"{"currentStep": 3, "completedSteps": [1, 2], "posData": {"provider": "lightspeed"}}"#,
        )
        .unwrap();
        assert_eq!(record.current_step, 3);
        assert_eq!(record.completed_steps, BTreeSet::from([1, 2]));
        assert_eq!(record.section("posData").unwrap()["provider"], "lightspeed");
        assert!(record.has_data_for(3));
        assert!(!record.has_data_for(4));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = OnboardingRecord::parse("{\"personnelData\": ").unwrap_err();
        assert!(matches!(err, RecordError::Malformed(_)));
    }

    #[test]
    fn non_object_is_an_error() {
        let err = OnboardingRecord::parse("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject { found: "array" }));
        let err = OnboardingRecord::parse("null").unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject { found: "null" }));
    }

    #[test]
    fn bad_progress_fields_fall_back() {
        let record = OnboardingRecord::parse(
            r#"{"currentStep": 42, "completedSteps": [0, 2, 9, "x", 2]}"#,
        )
        .unwrap();
        assert_eq!(record.current_step, WELCOME_STEP);
        assert_eq!(record.completed_steps, BTreeSet::from([2]));

        let record = OnboardingRecord::parse(r#"{"currentStep": "two"}"#).unwrap();
        assert_eq!(record.current_step, WELCOME_STEP);
    }

    #[test]
    fn empty_object_counts_as_saved() {
        let record = OnboardingRecord::parse(r#"{"stripeData": {}}"#).unwrap();
        assert!(record.has_data_for(2));
    }

    #[test]
    fn falsy_sections_do_not_count() {
        let record = OnboardingRecord::from_value(json!({
            "personnelData": null,
            "stripeData": false,
            "posData": "",
            "qrStandData": 0,
        }))
        .unwrap();
        for id in 1..=4 {
            assert!(!record.has_data_for(id), "step {id} should have no data");
        }
    }

    #[test]
    fn steps_without_domain_never_have_data() {
        let record = OnboardingRecord::from_value(json!({"messaging": {"sms": true}})).unwrap();
        assert!(!record.has_data_for(6));
        assert!(!record.has_data_for(0));
        assert!(!record.has_data_for(99));
    }

    #[test]
    fn serializes_back_with_unknown_keys() {
        let mut record = OnboardingRecord::from_value(json!({
            "currentStep": 2,
            "legacyFlag": true,
        }))
        .unwrap();
        record.completed_steps.insert(1);
        record.set_section("personnelData", json!({"staff": 4}));

        let value: Value = serde_json::from_str(&record.to_json_string().unwrap()).unwrap();
        assert_eq!(value["currentStep"], 2);
        assert_eq!(value["completedSteps"], json!([1]));
        assert_eq!(value["personnelData"]["staff"], 4);
        assert_eq!(value["legacyFlag"], true);
    }

    #[test]
    fn default_record_omits_completed_steps() {
        let value = serde_json::to_value(OnboardingRecord::default()).unwrap();
        assert_eq!(value, json!({"currentStep": 0}));
    }
}
