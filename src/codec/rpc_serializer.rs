use super::CodecError;
use serde_json::Value;

/// Converts structured envelope values to bytes and back.
///
/// Envelopes are always handed to the serializer as a dynamic [`Value`], so
/// the trait stays object-safe and a server or client can hold any
/// implementation behind an `Arc<dyn RpcSerializer>`.
pub trait RpcSerializer: Send + Sync {
    /// A stable, human-readable name used in diagnostics (e.g. `"json"`).
    fn name(&self) -> &'static str;

    /// Encodes a structured value into bytes.
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Parses bytes back into a structured value.
    ///
    /// Implementations must fail rather than return a partial value when the
    /// input is not well-formed.
    fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError>;
}
