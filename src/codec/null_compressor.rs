use super::{CodecError, RpcCompressor};

/// Identity compressor. Payloads pass through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCompressor;

impl RpcCompressor for NullCompressor {
    fn name(&self) -> &'static str {
        "null"
    }

    #[inline]
    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(bytes.to_vec())
    }

    #[inline]
    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(bytes.to_vec())
    }
}
