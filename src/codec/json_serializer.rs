use super::{CodecError, RpcSerializer};
use serde_json::Value;

/// The default serializer, backed by `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl RpcSerializer for JsonSerializer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|err| CodecError::Serialize {
            serializer: self.name(),
            reason: err.to_string(),
        })
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        serde_json::from_slice(bytes).map_err(|err| CodecError::Deserialize {
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
    fn rejects_trailing_garbage() {
        let result = JsonSerializer.deserialize(b"[1, {}, {}] trailing");
        assert!(matches!(result, Err(CodecError::Deserialize { .. })));
    }

    #[test]
    fn preserves_nested_values() {
        let value = json!([2, {"trace": "abc"}, {"items": [1, 2, {"k": null}]}]);
        let bytes = JsonSerializer.serialize(&value).unwrap();
        assert_eq!(JsonSerializer.deserialize(&bytes).unwrap(), value);
    }
}
