use super::{CodecError, RpcSerializer};
use serde_json::Value;

/// MessagePack serializer, backed by `rmp-serde`.
///
/// Servers and clients must agree on it; a JSON peer cannot read its payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgpackSerializer;

impl RpcSerializer for MsgpackSerializer {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn serialize(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        rmp_serde::to_vec(value).map_err(|err| CodecError::Serialize {
            serializer: self.name(),
            reason: err.to_string(),
        })
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        rmp_serde::from_slice(bytes).map_err(|err| CodecError::Deserialize {
            serializer: self.name(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preserves_nested_values() {
        let value = json!([2, {"trace": "abc"}, {"items": [1, -2, 1.5, {"k": null}], "ok": true}]);
        let bytes = MsgpackSerializer.serialize(&value).unwrap();
        assert_eq!(MsgpackSerializer.deserialize(&bytes).unwrap(), value);
    }

    #[test]
    fn rejects_reserved_marker() {
        // 0xc1 is never used by the format.
        let result = MsgpackSerializer.deserialize(&[0xc1]);
        assert!(matches!(result, Err(CodecError::Deserialize { serializer: "msgpack", .. })));
    }

    #[test]
    fn rejects_truncated_array() {
        // fixarray of three elements holding only one.
        let result = MsgpackSerializer.deserialize(&[0x93, 0x01]);
        assert!(matches!(result, Err(CodecError::Deserialize { .. })));
    }
}
