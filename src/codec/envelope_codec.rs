use super::{CodecError, JsonSerializer, MalformedRequest, NullCompressor, RpcCompressor, RpcSerializer};
use crate::rpc::{RpcArguments, RpcMetadata, RpcRequest, RpcResponse, RpcVersion};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Turns request and response envelopes into bytes and back.
///
/// Encoding serializes first and compresses second; decoding reverses the
/// order. Both capabilities are injected, and the codec itself is cheap to
/// clone.
#[derive(Clone)]
pub struct EnvelopeCodec {
    serializer: Arc<dyn RpcSerializer>,
    compressor: Arc<dyn RpcCompressor>,
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::new(Arc::new(JsonSerializer), Arc::new(NullCompressor))
    }
}

impl EnvelopeCodec {
    pub fn new(serializer: Arc<dyn RpcSerializer>, compressor: Arc<dyn RpcCompressor>) -> Self {
        Self {
            serializer,
            compressor,
        }
    }

    pub fn serializer_name(&self) -> &'static str {
        self.serializer.name()
    }

    pub fn compressor_name(&self) -> &'static str {
        self.compressor.name()
    }

    /// Encodes the parts of a request without building an [`RpcRequest`].
    pub fn encode(
        &self,
        version: &RpcVersion,
        metadata: &RpcMetadata,
        arguments: &RpcArguments,
    ) -> Result<Vec<u8>, CodecError> {
        let envelope = Value::Array(vec![
            version.to_value(),
            Value::Object(metadata.clone()),
            Value::Object(arguments.clone()),
        ]);
        self.encode_value(&envelope)
    }

    pub fn encode_request(&self, request: &RpcRequest) -> Result<Vec<u8>, CodecError> {
        self.encode_value(&request.to_envelope())
    }

    /// Decodes a request payload.
    ///
    /// Any failure, whether in decompression, in parsing, or in the shape of
    /// the parsed value, is reported as [`MalformedRequest`] holding the raw
    /// payload.
    pub fn decode_request(&self, bytes: &[u8]) -> Result<RpcRequest, MalformedRequest> {
        let envelope = self
            .decode_value(bytes)
            .map_err(|err| MalformedRequest::new(self.serializer.name(), bytes, err.to_string()))?;

        RpcRequest::from_envelope(envelope)
            .map_err(|err| MalformedRequest::new(self.serializer.name(), bytes, err.to_string()))
    }

    pub fn encode_response(&self, response: &RpcResponse) -> Result<Vec<u8>, CodecError> {
        self.encode_value(&response.to_envelope())
    }

    pub fn decode_response(&self, bytes: &[u8]) -> Result<RpcResponse, CodecError> {
        let envelope = self.decode_value(bytes)?;
        Ok(RpcResponse::from_envelope(envelope)?)
    }

    fn encode_value(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let serialized = self.serializer.serialize(value)?;
        self.compressor.compress(&serialized)
    }

    fn decode_value(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        let decompressed = self.compressor.decompress(bytes)?;
        self.serializer.deserialize(&decompressed)
    }
}

impl fmt::Debug for EnvelopeCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeCodec")
            .field("serializer", &self.serializer.name())
            .field("compressor", &self.compressor.name())
            .finish()
    }
}
