// ── Record: one schemaless entry of a resource ──
//
// Records are open field maps (form data plus generated `id` and
// `timestamp`). Field order is preserved so notifications list fields
// the way they were submitted.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ID_FIELD: &str = "id";
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Field map supplied by a form.
pub type Fields = Map<String, Value>;

/// One entry within a resource. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Fields);

impl Record {
    pub fn new(fields: Fields) -> Self {
        Self(fields)
    }

    /// Build a new record from form fields plus generated metadata.
    ///
    /// Generated `id` and `timestamp` replace same-named supplied fields.
    pub fn stamped(mut fields: Fields, id: u64, created_at: DateTime<Utc>) -> Self {
        fields.insert(ID_FIELD.into(), Value::from(id));
        fields.insert(
            TIMESTAMP_FIELD.into(),
            Value::String(created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        Self(fields)
    }

    pub fn id(&self) -> Option<&Value> {
        self.0.get(ID_FIELD)
    }

    /// Identity used for deduplication.
    ///
    /// Numbers compare by value (`1`, `1.0` and `1e0` are one id) but never
    /// equal strings (`1` and `"1"` are different ids). All records without
    /// an `id` share the `None` identity.
    pub fn identity(&self) -> Option<String> {
        self.id().map(|id| match id {
            Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), number_identity),
            other => other.to_string(),
        })
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.0.get(TIMESTAMP_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Display text for a field; empty when absent.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(display_value).unwrap_or_default()
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Fields other than the generated `id` / `timestamp`.
    pub fn user_fields(&self) -> Fields {
        self.0
            .iter()
            .filter(|(k, _)| k.as_str() != ID_FIELD && k.as_str() != TIMESTAMP_FIELD)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

// f64 Display prints integral values without a fraction. Adding +0 folds -0 into 0.
fn number_identity(f: f64) -> String {
    (f + 0.0).to_string()
}

/// Render a JSON value the way a template literal would: bare strings,
/// plain numbers and booleans, nothing for null, JSON for containers.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// JavaScript-style falsiness: null, false, 0, NaN and "".
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
