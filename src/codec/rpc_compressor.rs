use super::CodecError;

/// A bytes-to-bytes transform applied after serialization and reversed
/// before deserialization.
pub trait RpcCompressor: Send + Sync {
    fn name(&self) -> &'static str;

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, CodecError>;

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, CodecError>;
}
