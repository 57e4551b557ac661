mod codec_error;
mod envelope_codec;
mod json_serializer;
mod msgpack_serializer;
mod null_compressor;
mod rpc_compressor;
mod rpc_serializer;

pub use codec_error::{CodecError, MalformedRequest};
pub use envelope_codec::EnvelopeCodec;
pub use json_serializer::JsonSerializer;
pub use msgpack_serializer::MsgpackSerializer;
pub use null_compressor::NullCompressor;
pub use rpc_compressor::RpcCompressor;
pub use rpc_serializer::RpcSerializer;
