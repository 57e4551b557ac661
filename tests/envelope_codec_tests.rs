use coney::codec::{
    CodecError, EnvelopeCodec, JsonSerializer, MsgpackSerializer, NullCompressor, RpcCompressor,
    RpcSerializer,
};
use coney::rpc::{RpcArguments, RpcMetadata, RpcRequest, RpcResponse, RpcResponseCode, RpcVersion};
use serde_json::{Value, json};
use std::sync::Arc;

fn map(value: Value) -> RpcArguments {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a map, got {other:?}"),
    }
}

/// Reverses the payload so tests can tell whether the compressor ran.
struct ReversingCompressor;

impl RpcCompressor for ReversingCompressor {
    fn name(&self) -> &'static str {
        "reverse"
    }

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(bytes.iter().rev().copied().collect())
    }

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(bytes.iter().rev().copied().collect())
    }
}

#[test]
fn request_survives_encode_and_decode() {
    let codec = EnvelopeCodec::default();
    let version = RpcVersion::Number(3);
    let metadata: RpcMetadata = map(json!({"trace_id": "abc-123", "attempt": 2}));
    let arguments = map(json!({"x": 42, "names": ["a", "b"], "nested": {"ok": true}}));

    let bytes = codec.encode(&version, &metadata, &arguments).unwrap();
    let request = codec.decode_request(&bytes).unwrap();

    assert_eq!(request, RpcRequest::new(version, metadata, arguments));
}

#[test]
fn tag_versions_survive_encode_and_decode() {
    let codec = EnvelopeCodec::default();
    let request = RpcRequest::with_arguments("2024-beta", RpcArguments::new());

    let bytes = codec.encode_request(&request).unwrap();

    assert_eq!(codec.decode_request(&bytes).unwrap(), request);
}

#[test]
fn wire_format_is_a_three_element_sequence() {
    let codec = EnvelopeCodec::default();
    let request = RpcRequest::with_arguments(RpcVersion::Number(1), map(json!({"x": 42})));

    let bytes = codec.encode_request(&request).unwrap();
    let raw: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(raw, json!([1, {}, {"x": 42}]));
}

#[test]
fn unparseable_payload_is_malformed() {
    let codec = EnvelopeCodec::default();
    let payload = b"not-a-valid-payload";

    let err = codec.decode_request(payload).unwrap_err();

    assert_eq!(err.serializer_name(), "json");
    assert_eq!(err.payload(), payload);
    assert!(err.to_string().contains("not-a-valid-payload"));
}

#[test]
fn short_envelope_is_malformed() {
    let codec = EnvelopeCodec::default();

    let payloads: [&[u8]; 3] = [b"[]", b"[1]", b"[1, {}]"];

    for payload in payloads {
        let err = codec.decode_request(payload).unwrap_err();
        assert_eq!(err.payload(), payload);
    }
}

#[test]
fn envelope_shape_violations_are_malformed() {
    let codec = EnvelopeCodec::default();
    let payloads: [&[u8]; 6] = [
        b"{\"version\": 1}",
        b"[1, {}, {}, {}]",
        b"[1.5, {}, {}]",
        b"[true, {}, {}]",
        b"[1, [], {}]",
        b"[1, {}, \"x\"]",
    ];

    for payload in payloads {
        assert!(
            codec.decode_request(payload).is_err(),
            "{} should be rejected",
            String::from_utf8_lossy(payload)
        );
    }
}

#[test]
fn compressor_runs_after_serializer() {
    let codec = EnvelopeCodec::new(Arc::new(JsonSerializer), Arc::new(ReversingCompressor));
    let request = RpcRequest::with_arguments(RpcVersion::Number(1), map(json!({"x": 1})));

    let bytes = codec.encode_request(&request).unwrap();
    let mut unreversed = bytes.clone();
    unreversed.reverse();

    assert_eq!(
        JsonSerializer.deserialize(&unreversed).unwrap(),
        json!([1, {}, {"x": 1}])
    );
    assert_eq!(codec.decode_request(&bytes).unwrap(), request);
    assert_eq!(codec.compressor_name(), "reverse");
}

#[test]
fn compressed_payload_read_without_decompression_is_malformed() {
    let compressing = EnvelopeCodec::new(Arc::new(JsonSerializer), Arc::new(ReversingCompressor));
    let plain = EnvelopeCodec::default();
    let request = RpcRequest::with_arguments(RpcVersion::Number(1), RpcArguments::new());

    let bytes = compressing.encode_request(&request).unwrap();

    assert!(plain.decode_request(&bytes).is_err());
}

#[test]
fn responses_survive_encode_and_decode() {
    let codec = EnvelopeCodec::default();
    let responses = [
        RpcResponse::success(json!({"sum": 6})),
        RpcResponse::success(Value::Null),
        RpcResponse::from_code(RpcResponseCode::MethodNotFound),
        RpcResponse::failure(
            RpcResponseCode::UnexpectedDispatchException,
            Some("division by zero".into()),
        ),
    ];

    for response in responses {
        let bytes = codec.encode_response(&response).unwrap();
        assert_eq!(codec.decode_response(&bytes).unwrap(), response);
    }
}

#[test]
fn malformed_response_is_reported() {
    let codec = EnvelopeCodec::default();

    assert!(matches!(
        codec.decode_response(b"[null]"),
        Err(CodecError::MalformedResponse(_))
    ));
    assert!(matches!(
        codec.decode_response(b"[null, 42, \"x\"]"),
        Err(CodecError::MalformedResponse(_))
    ));
    assert!(matches!(
        codec.decode_response(b"garbage"),
        Err(CodecError::Deserialize { .. })
    ));
}

fn msgpack_codec() -> EnvelopeCodec {
    EnvelopeCodec::new(Arc::new(MsgpackSerializer), Arc::new(NullCompressor))
}

#[test]
fn msgpack_request_survives_encode_and_decode() {
    let codec = msgpack_codec();
    let metadata: RpcMetadata = map(json!({"trace_id": "abc-123"}));
    let arguments = map(json!({"x": -7, "ratio": 0.25, "tags": ["a", null]}));

    let bytes = codec
        .encode(&RpcVersion::Number(2), &metadata, &arguments)
        .unwrap();

    assert_eq!(codec.serializer_name(), "msgpack");
    assert_eq!(
        codec.decode_request(&bytes).unwrap(),
        RpcRequest::new(2u32, metadata, arguments)
    );
}

#[test]
fn msgpack_responses_survive_encode_and_decode() {
    let codec = msgpack_codec();
    let responses = [
        RpcResponse::success(json!([1, 2.5, "three"])),
        RpcResponse::failure(RpcResponseCode::RemoteExecError, Some("bad input".into())),
    ];

    for response in responses {
        let bytes = codec.encode_response(&response).unwrap();
        assert_eq!(codec.decode_response(&bytes).unwrap(), response);
    }
}

#[test]
fn msgpack_garbage_is_malformed() {
    let codec = msgpack_codec();

    let err = codec.decode_request(&[0xc1, 0x00]).unwrap_err();
    assert_eq!(err.serializer_name(), "msgpack");

    // A lone msgpack integer parses but is not an envelope.
    assert!(codec.decode_request(b"not-a-valid-payload").is_err());
}

#[test]
fn json_payload_is_not_msgpack() {
    let bytes = EnvelopeCodec::default()
        .encode_request(&RpcRequest::with_arguments(1u32, map(json!({"x": 1}))))
        .unwrap();

    assert!(msgpack_codec().decode_request(&bytes).is_err());
}
