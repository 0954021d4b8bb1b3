//! Per-field effect state accumulated by the host

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Requested changes to one field.
///
/// `None` means the attribute was never set in this request. For `value`,
/// `Some(Value::Null)` is an explicit override to null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldEffect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_value"
    )]
    pub value: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`
fn explicit_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Field name → effect, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectMap {
    fields: BTreeMap<String, FieldEffect>,
}

impl EffectMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins; other attributes are untouched
    pub fn set_required(&mut self, field: &str, required: bool) {
        self.entry(field).required = Some(required);
    }

    pub fn set_display(&mut self, field: &str, display: bool) {
        self.entry(field).display = Some(display);
    }

    pub fn set_value(&mut self, field: &str, value: Value) {
        self.entry(field).value = Some(value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldEffect> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldEffect)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn entry(&mut self, field: &str) -> &mut FieldEffect {
        self.fields.entry(field.to_string()).or_default()
    }
}
