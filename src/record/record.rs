//! Record snapshots and typed field extraction

use serde_json::{Map, Value};

use super::errors::{RecordError, RecordResult};

/// One immutable snapshot of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    root: Value,
}

impl Record {
    /// Parse a snapshot. `what` names the snapshot in error messages.
    pub fn parse(what: &'static str, bytes: &[u8]) -> RecordResult<Self> {
        let root = serde_json::from_slice(bytes).map_err(|e| RecordError::Parse {
            what,
            reason: e.to_string(),
        })?;
        Ok(Self { root })
    }

    /// Wrap an already-parsed tree
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// The whole tree
    pub fn value(&self) -> &Value {
        &self.root
    }

    /// Hosts send `null` when there is no previous snapshot
    pub fn is_null(&self) -> bool {
        self.root.is_null()
    }

    /// Top-level fields, or a shape error if the record is not an object
    pub fn fields(&self) -> RecordResult<Fields<'_>> {
        match &self.root {
            Value::Object(map) => Ok(Fields { map }),
            other => Err(RecordError::Shape {
                found: json_type_name(other),
            }),
        }
    }
}

/// Borrowed view over a record's top-level keys
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Raw lookup; only absence and null are distinguished
    pub fn get(&self, name: &str) -> Lookup<&'a Value> {
        match self.map.get(name) {
            None => Lookup::Absent,
            Some(Value::Null) => Lookup::Null,
            Some(value) => Lookup::Present(value),
        }
    }

    /// Numeric field. Integers and floats both read as `f64`.
    pub fn number(&self, name: &str) -> Lookup<f64> {
        self.get(name).and_then(|value| match value {
            Value::Number(n) => n.as_f64().map_or(
                Lookup::WrongType { found: "number" },
                Lookup::Present,
            ),
            other => Lookup::WrongType {
                found: json_type_name(other),
            },
        })
    }

    /// String field
    pub fn string(&self, name: &str) -> Lookup<&'a str> {
        self.get(name).and_then(|value| match value {
            Value::String(s) => Lookup::Present(s.as_str()),
            other => Lookup::WrongType {
                found: json_type_name(other),
            },
        })
    }

    /// Boolean field
    pub fn boolean(&self, name: &str) -> Lookup<bool> {
        self.get(name).and_then(|value| match value {
            Value::Bool(b) => Lookup::Present(*b),
            other => Lookup::WrongType {
                found: json_type_name(other),
            },
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }
}

/// Outcome of reading one field.
///
/// Absence, an explicit null and a value of the wrong type are kept apart so
/// rules choose their own default for each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<T> {
    Absent,
    Null,
    WrongType { found: &'static str },
    Present(T),
}

impl<T> Lookup<T> {
    /// The value, or `default` for every other case
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Lookup::Present(value) => value,
            _ => default,
        }
    }

    pub fn present(self) -> Option<T> {
        match self {
            Lookup::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_wrong_type(&self) -> bool {
        matches!(self, Lookup::WrongType { .. })
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Lookup<U>) -> Lookup<U> {
        match self {
            Lookup::Absent => Lookup::Absent,
            Lookup::Null => Lookup::Null,
            Lookup::WrongType { found } => Lookup::WrongType { found },
            Lookup::Present(value) => f(value),
        }
    }
}

/// JSON type name for messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
