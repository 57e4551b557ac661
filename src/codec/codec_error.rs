use crate::rpc::EnvelopeError;

/// Failures raised by the serializer, the compressor, or while shaping an
/// envelope.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("{serializer} failed to serialize: {reason}")]
    Serialize {
        serializer: &'static str,
        reason: String,
    },

    #[error("{serializer} failed to deserialize: {reason}")]
    Deserialize {
        serializer: &'static str,
        reason: String,
    },

    #[error("{compressor} failed to compress: {reason}")]
    Compress {
        compressor: &'static str,
        reason: String,
    },

    #[error("{compressor} failed to decompress: {reason}")]
    Decompress {
        compressor: &'static str,
        reason: String,
    },

    /// A reply payload decoded but did not have the response shape.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] EnvelopeError),
}

/// A payload could not be turned into a request.
///
/// Carries the name of the serializer that was configured and the raw bytes
/// that were received, so the failure can be reported without access to the
/// codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{serializer_name} failed to create a Request from payload {:?}: {reason}",
    String::from_utf8_lossy(.payload)
)]
pub struct MalformedRequest {
    serializer_name: String,
    payload: Vec<u8>,
    reason: String,
}

impl MalformedRequest {
    pub fn new(serializer_name: &str, payload: &[u8], reason: impl Into<String>) -> Self {
        Self {
            serializer_name: serializer_name.to_string(),
            payload: payload.to_vec(),
            reason: reason.into(),
        }
    }

    pub fn serializer_name(&self) -> &str {
        &self.serializer_name
    }

    /// The raw bytes as received, before decompression.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}
