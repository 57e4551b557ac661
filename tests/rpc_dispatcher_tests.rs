use bytes::Bytes;
use coney::broker::{
    BrokerError, RpcAcknowledger, RpcBroker, RpcConsumer, RpcDelivery, RpcOutboundMessage,
};
use coney::codec::EnvelopeCodec;
use coney::rpc::{
    RemoteExecError, RpcArguments, RpcDispatcher, RpcHandlerRegistry, RpcRequest, RpcResponse,
    RpcResponseCode, RpcVersion,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Records publishes and acknowledgements in the order they happen.
#[derive(Default)]
struct RecordingBroker {
    events: Arc<Mutex<Vec<String>>>,
    published: Mutex<Vec<RpcOutboundMessage>>,
}

struct RecordingAck {
    delivery_tag: u64,
    events: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl RpcAcknowledger for RecordingAck {
    async fn ack(self: Box<Self>) -> Result<(), BrokerError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("ack:{}", self.delivery_tag));
        Ok(())
    }
}

#[async_trait::async_trait]
impl RpcBroker for RecordingBroker {
    async fn declare_queue(&self, _queue: &str) -> Result<(), BrokerError> {
        Ok(())
    }

    async fn consume(&self, queue: &str, _prefetch_count: u16) -> Result<RpcConsumer, BrokerError> {
        Err(BrokerError::QueueNotFound(queue.to_string()))
    }

    async fn publish(&self, message: RpcOutboundMessage) -> Result<(), BrokerError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("publish:{}", message.routing_key()));
        self.published.lock().unwrap().push(message);
        Ok(())
    }
}

impl RecordingBroker {
    fn delivery(&self, delivery_tag: u64, payload: Vec<u8>, reply_to: Option<&str>) -> RpcDelivery {
        RpcDelivery::new(
            delivery_tag,
            Bytes::from(payload),
            reply_to.map(str::to_string),
            Some(format!("corr-{delivery_tag}")),
            Box::new(RecordingAck {
                delivery_tag,
                events: self.events.clone(),
            }),
        )
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn published(&self) -> Vec<RpcOutboundMessage> {
        self.published.lock().unwrap().clone()
    }
}

fn arguments(value: Value) -> RpcArguments {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a map, got {other:?}"),
    }
}

#[derive(Deserialize)]
struct EchoArgs {
    x: Value,
}

fn echo_dispatcher() -> RpcDispatcher {
    let mut registry = RpcHandlerRegistry::new();
    registry
        .register_handler("echo", 1u32, |args: RpcArguments| async move {
            let args: EchoArgs = serde_json::from_value(Value::Object(args))?;
            Ok(args.x)
        })
        .unwrap();
    registry
        .register_handler("echo", 2u32, |_args: RpcArguments| async {
            Err(RemoteExecError::new("x must be positive").into())
        })
        .unwrap();
    registry
        .register_handler("echo", 3u32, |_args: RpcArguments| async {
            Err("connection reset by peer".into())
        })
        .unwrap();
    registry
        .register_handler("echo", 4u32, |_args: RpcArguments| async {
            Err(RemoteExecError::with_code(
                RpcResponseCode::RemoteUnhandledException,
                "worker crashed",
            )
            .into())
        })
        .unwrap();
    registry
        .register_handler("echo", 5u32, |_args: RpcArguments| async {
            if true {
                panic!("handler exploded");
            }
            Ok(Value::Null)
        })
        .unwrap();

    RpcDispatcher::new("echo", Arc::new(registry), EnvelopeCodec::default())
}

#[tokio::test]
async fn echo_returns_its_argument() {
    let dispatcher = echo_dispatcher();
    let request = RpcRequest::with_arguments(RpcVersion::Number(1), arguments(json!({"x": 42})));

    let response = dispatcher.dispatch_request(request).await;

    assert_eq!(response, RpcResponse::success(json!(42)));
    assert_eq!(response.details(), None);
}

#[tokio::test]
async fn invalid_payload_is_a_malformed_request() {
    let dispatcher = echo_dispatcher();

    let response = dispatcher.dispatch(b"not-a-valid-payload").await;

    assert_eq!(response.code(), RpcResponseCode::MalformedRequest);
    assert_eq!(response.value(), None);
    assert_eq!(response.details(), None);
}

#[tokio::test]
async fn short_envelope_is_a_malformed_request() {
    let dispatcher = echo_dispatcher();

    let response = dispatcher.dispatch(b"[1, {}]").await;

    assert_eq!(response.code(), RpcResponseCode::MalformedRequest);
}

#[tokio::test]
async fn unregistered_method_is_not_found() {
    let registry = Arc::new(RpcHandlerRegistry::new());
    let dispatcher = RpcDispatcher::new("missing", registry, EnvelopeCodec::default());

    let response = dispatcher.dispatch(b"[1, {}, {}]").await;

    assert_eq!(response.code(), RpcResponseCode::MethodNotFound);
    assert_eq!(response.value(), None);
}

#[tokio::test]
async fn unregistered_version_is_not_found() {
    let dispatcher = echo_dispatcher();

    let response = dispatcher.dispatch(b"[99, {}, {\"x\": 1}]").await;

    assert_eq!(response.code(), RpcResponseCode::VersionNotFound);
    assert_eq!(response.value(), None);
}

#[tokio::test]
async fn remote_exec_error_carries_code_and_details() {
    let dispatcher = echo_dispatcher();

    let response = dispatcher.dispatch(b"[2, {}, {}]").await;
    assert_eq!(response.code(), RpcResponseCode::RemoteExecError);
    assert_eq!(response.details(), Some("x must be positive"));

    let response = dispatcher.dispatch(b"[4, {}, {}]").await;
    assert_eq!(response.code(), RpcResponseCode::RemoteUnhandledException);
    assert_eq!(response.details(), Some("worker crashed"));
}

#[tokio::test]
async fn unexpected_failure_is_summarised() {
    let dispatcher = echo_dispatcher();

    let response = dispatcher.dispatch(b"[3, {}, {}]").await;

    assert_eq!(response.code(), RpcResponseCode::UnexpectedDispatchException);
    assert_eq!(response.details(), Some("connection reset by peer"));
    assert_eq!(response.value(), None);
}

#[tokio::test]
async fn mismatched_arguments_are_unexpected() {
    let dispatcher = echo_dispatcher();

    let response = dispatcher.dispatch(b"[1, {}, {\"y\": 1}]").await;

    assert_eq!(response.code(), RpcResponseCode::UnexpectedDispatchException);
    assert!(response.details().is_some_and(|details| details.contains("x")));
}

#[tokio::test]
async fn panicking_handler_is_unexpected() {
    let dispatcher = echo_dispatcher();

    let response = dispatcher.dispatch(b"[5, {}, {}]").await;

    assert_eq!(response.code(), RpcResponseCode::UnexpectedDispatchException);
    assert!(
        response
            .details()
            .is_some_and(|details| details.contains("handler exploded"))
    );
}

#[tokio::test]
async fn reply_is_published_before_ack() {
    let dispatcher = echo_dispatcher();
    let broker = RecordingBroker::default();
    let delivery = broker.delivery(7, b"[1, {}, {\"x\": \"hi\"}]".to_vec(), Some("reply.q"));

    dispatcher.handle_delivery(delivery, &broker).await;

    assert_eq!(broker.events(), ["publish:reply.q", "ack:7"]);
    let published = broker.published();
    assert_eq!(published[0].correlation_id(), Some("corr-7"));
    assert_eq!(published[0].reply_to(), None);
    let response = dispatcher
        .codec()
        .decode_response(published[0].payload())
        .unwrap();
    assert_eq!(response, RpcResponse::success(json!("hi")));
}

#[tokio::test]
async fn failures_are_replied_and_acknowledged() {
    let dispatcher = echo_dispatcher();
    let broker = RecordingBroker::default();

    for (tag, payload) in [
        (1, b"not-a-valid-payload".to_vec()),
        (2, b"[42, {}, {}]".to_vec()),
        (3, b"[3, {}, {}]".to_vec()),
        (4, b"[5, {}, {}]".to_vec()),
    ] {
        dispatcher
            .handle_delivery(broker.delivery(tag, payload, Some("reply.q")), &broker)
            .await;
    }

    let acks: Vec<_> = broker
        .events()
        .into_iter()
        .filter(|event| event.starts_with("ack:"))
        .collect();
    assert_eq!(acks, ["ack:1", "ack:2", "ack:3", "ack:4"]);

    let codes: Vec<_> = broker
        .published()
        .iter()
        .map(|message| {
            dispatcher
                .codec()
                .decode_response(message.payload())
                .unwrap()
                .code()
        })
        .collect();
    assert_eq!(
        codes,
        [
            RpcResponseCode::MalformedRequest,
            RpcResponseCode::VersionNotFound,
            RpcResponseCode::UnexpectedDispatchException,
            RpcResponseCode::UnexpectedDispatchException,
        ]
    );
}

#[tokio::test]
async fn delivery_without_reply_address_is_still_acknowledged() {
    let dispatcher = echo_dispatcher();
    let broker = RecordingBroker::default();

    dispatcher
        .handle_delivery(broker.delivery(11, b"[1, {}, {\"x\": 1}]".to_vec(), None), &broker)
        .await;

    assert_eq!(broker.events(), ["ack:11"]);
    assert!(broker.published().is_empty());
}
