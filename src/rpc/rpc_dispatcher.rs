use crate::broker::{RpcBroker, RpcDelivery, RpcOutboundMessage};
use crate::codec::EnvelopeCodec;
use crate::rpc::{
    DispatchOutcome, RemoteExecError, RpcHandler, RpcHandlerRegistry, RpcRequest, RpcResponse,
    RpcResponseCode,
};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Serves every version of one method.
///
/// There is one dispatcher per method binding. For each delivery it decodes
/// the request, resolves the version-specific handler, runs it, replies to
/// the caller and acknowledges the delivery. No failure escapes a dispatch
/// cycle: each one becomes a typed response, and the delivery is always
/// acknowledged so a bad message cannot block the queue.
#[derive(Clone)]
pub struct RpcDispatcher {
    method_name: String,
    registry: Arc<RpcHandlerRegistry>,
    codec: EnvelopeCodec,
}

impl RpcDispatcher {
    pub fn new(
        method_name: impl Into<String>,
        registry: Arc<RpcHandlerRegistry>,
        codec: EnvelopeCodec,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            registry,
            codec,
        }
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn codec(&self) -> &EnvelopeCodec {
        &self.codec
    }

    /// Runs a full cycle for one delivery: dispatch, reply, acknowledge.
    ///
    /// The reply is published before the delivery is acknowledged. A delivery
    /// without a reply address is still executed and acknowledged, but
    /// nothing is published for it.
    pub async fn handle_delivery<B>(&self, delivery: RpcDelivery, broker: &B)
    where
        B: RpcBroker + ?Sized,
    {
        tracing::trace!(
            "Dispatching delivery {} on {}",
            delivery.delivery_tag(),
            self.method_name
        );

        let response = self.dispatch(delivery.payload()).await;
        self.reply(&delivery, &response, broker).await;

        let delivery_tag = delivery.delivery_tag();
        if let Err(err) = delivery.ack().await {
            tracing::error!(
                "Failed to acknowledge delivery {} on {}: {}",
                delivery_tag,
                self.method_name,
                err
            );
        }
    }

    /// Decodes, resolves and executes a raw payload.
    pub async fn dispatch(&self, payload: &[u8]) -> RpcResponse {
        let outcome = match self.codec.decode_request(payload) {
            Ok(request) => self.dispatch_outcome(request).await,
            Err(malformed) => malformed.into(),
        };
        self.log_outcome(&outcome, payload);
        outcome.into()
    }

    /// Resolves and executes an already decoded request.
    pub async fn dispatch_request(&self, request: RpcRequest) -> RpcResponse {
        let outcome = self.dispatch_outcome(request).await;
        self.log_outcome(&outcome, &[]);
        outcome.into()
    }

    async fn dispatch_outcome(&self, request: RpcRequest) -> DispatchOutcome {
        match self.registry.resolve(&self.method_name, request.version()) {
            Ok(handler) => self.execute(handler, request).await,
            Err(err) => err.into(),
        }
    }

    async fn execute(&self, handler: RpcHandler, request: RpcRequest) -> DispatchOutcome {
        let (version, _metadata, arguments) = request.into_parts();

        // The handler is called inside the future so a panic raised before
        // its first await is caught as well.
        let invocation = AssertUnwindSafe(async move { handler(arguments).await }).catch_unwind();

        match invocation.await {
            Ok(Ok(value)) => DispatchOutcome::Executed(value),
            Ok(Err(err)) => match err.downcast::<RemoteExecError>() {
                Ok(remote) => DispatchOutcome::RemoteError(*remote),
                Err(err) => {
                    tracing::warn!(
                        "Unhandled error during invocation of {} (version {}): {:?}",
                        self.method_name,
                        version,
                        err
                    );
                    let summary = err.to_string();
                    DispatchOutcome::Unexpected(if summary.is_empty() {
                        format!("{err:?}")
                    } else {
                        summary
                    })
                }
            },
            Err(panic) => {
                let summary = format!("handler panicked: {}", panic_message(panic.as_ref()));
                tracing::warn!(
                    "Panic during invocation of {} (version {}): {}",
                    self.method_name,
                    version,
                    summary
                );
                DispatchOutcome::Unexpected(summary)
            }
        }
    }

    async fn reply<B>(&self, delivery: &RpcDelivery, response: &RpcResponse, broker: &B)
    where
        B: RpcBroker + ?Sized,
    {
        let Some(reply_to) = delivery.reply_to() else {
            tracing::warn!(
                "Delivery {} on {} has no reply address; dropping {} response",
                delivery.delivery_tag(),
                self.method_name,
                response.code()
            );
            return;
        };

        let Some(body) = self.encode_reply(response) else {
            return;
        };

        tracing::debug!("Replying to {} with: {:?}", reply_to, response);
        let message = RpcOutboundMessage::reply(
            reply_to,
            delivery.correlation_id().map(str::to_string),
            body,
        );
        if let Err(err) = broker.publish(message).await {
            tracing::error!(
                "Failed to publish reply for {} to {}: {}",
                self.method_name,
                reply_to,
                err
            );
        }
    }

    /// Encodes a response, falling back to an unexpected-dispatch response
    /// when the original cannot be encoded.
    fn encode_reply(&self, response: &RpcResponse) -> Option<Vec<u8>> {
        match self.codec.encode_response(response) {
            Ok(body) => Some(body),
            Err(err) => {
                tracing::error!(
                    "Failed to encode {} response for {}: {}",
                    response.code(),
                    self.method_name,
                    err
                );
                let fallback = RpcResponse::failure(
                    RpcResponseCode::UnexpectedDispatchException,
                    Some(err.to_string()),
                );
                self.codec
                    .encode_response(&fallback)
                    .inspect_err(|err| {
                        tracing::error!(
                            "Failed to encode fallback response for {}: {}",
                            self.method_name,
                            err
                        );
                    })
                    .ok()
            }
        }
    }

    fn log_outcome(&self, outcome: &DispatchOutcome, payload: &[u8]) {
        let code = outcome.response_code();
        match outcome {
            DispatchOutcome::Executed(_) => {
                tracing::trace!("{} executed successfully", self.method_name);
            }
            DispatchOutcome::Malformed(err) => {
                tracing::warn!(
                    "Dispatch exception [{}] '{}': {}",
                    code.value(),
                    code.describe(),
                    err
                );
            }
            DispatchOutcome::MethodNotFound { .. } | DispatchOutcome::VersionNotFound { .. } => {
                tracing::warn!(
                    "Dispatch exception [{}] '{}': {:?}",
                    code.value(),
                    code.describe(),
                    String::from_utf8_lossy(payload)
                );
            }
            DispatchOutcome::RemoteError(err) => {
                tracing::debug!("Exec error [{}]: {}", code.value(), err.details());
            }
            // Already logged with the full error at the point of failure.
            DispatchOutcome::Unexpected(_) => {}
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
