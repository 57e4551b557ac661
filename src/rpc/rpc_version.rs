use serde_json::Value;
use std::fmt;

/// Selects which implementation of a method handles a request.
///
/// Versions are either a non-negative integer or an opaque string tag. The
/// two forms never compare equal: `1` and `"1"` address different handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RpcVersion {
    Number(u64),
    Tag(String),
}

impl RpcVersion {
    /// Reads a version from its envelope representation.
    ///
    /// Returns `None` for anything other than a non-negative integer or a
    /// string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(RpcVersion::Number),
            Value::String(tag) => Some(RpcVersion::Tag(tag.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RpcVersion::Number(n) => Value::from(*n),
            RpcVersion::Tag(tag) => Value::String(tag.clone()),
        }
    }
}

impl fmt::Display for RpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcVersion::Number(n) => write!(f, "{n}"),
            RpcVersion::Tag(tag) => write!(f, "{tag:?}"),
        }
    }
}

impl From<u64> for RpcVersion {
    fn from(n: u64) -> Self {
        RpcVersion::Number(n)
    }
}

impl From<u32> for RpcVersion {
    fn from(n: u32) -> Self {
        RpcVersion::Number(u64::from(n))
    }
}

impl From<&str> for RpcVersion {
    fn from(tag: &str) -> Self {
        RpcVersion::Tag(tag.to_string())
    }
}

impl From<String> for RpcVersion {
    fn from(tag: String) -> Self {
        RpcVersion::Tag(tag)
    }
}

impl From<&RpcVersion> for RpcVersion {
    fn from(version: &RpcVersion) -> Self {
        version.clone()
    }
}
