use serde_json::Value;

/// The decoded value did not have the shape of a request or response envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("expected a sequence, found {found}")]
    NotASequence { found: &'static str },

    #[error("expected {expected} top-level elements, found {found}")]
    ElementCount { expected: &'static str, found: usize },

    #[error("version must be a non-negative integer or a string, found {found}")]
    InvalidVersion { found: &'static str },

    #[error("{field} must be a map, found {found}")]
    NotAMap {
        field: &'static str,
        found: &'static str,
    },

    #[error("unknown response code {0}")]
    UnknownResponseCode(String),

    #[error("details must be a string or null, found {found}")]
    InvalidDetails { found: &'static str },
}

/// Short name of a value's type, for diagnostics.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(n) if n.is_i64() && n.as_i64().is_some_and(|n| n < 0) => "negative integer",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}
