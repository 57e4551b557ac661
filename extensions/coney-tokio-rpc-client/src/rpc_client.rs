use crate::response_mapping::response_to_result;
use bytes::Bytes;
use coney::ConeyError;
use coney::broker::{BrokerError, RpcBroker, RpcConsumer, RpcOutboundMessage};
use coney::codec::EnvelopeCodec;
use coney::constants::{DEFAULT_CALL_TIMEOUT, REPLY_QUEUE_PREFIX};
use coney::rpc::{RpcArguments, RpcMetadata, RpcVersion};
use coney::utils::{generate_correlation_id, generate_queue_name};
use coney_rpc_service::RpcClientInterface;
use futures::StreamExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Calls awaiting a reply, keyed by correlation token.
#[derive(Clone, Default)]
struct PendingCalls(Arc<Mutex<HashMap<String, oneshot::Sender<Bytes>>>>);

impl PendingCalls {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, oneshot::Sender<Bytes>>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a call. Its entry lives as long as the returned guard.
    fn register(&self, correlation_id: &str) -> (PendingCallGuard, oneshot::Receiver<Bytes>) {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.lock().insert(correlation_id.to_string(), reply_tx);
        let guard = PendingCallGuard {
            pending: self.clone(),
            correlation_id: correlation_id.to_string(),
        };
        (guard, reply_rx)
    }

    fn take(&self, correlation_id: &str) -> Option<oneshot::Sender<Bytes>> {
        self.lock().remove(correlation_id)
    }
}

/// Removes a call's entry however the call ends, including when its future
/// is dropped before a reply arrives.
struct PendingCallGuard {
    pending: PendingCalls,
    correlation_id: String,
}

impl Drop for PendingCallGuard {
    fn drop(&mut self) {
        self.pending.take(&self.correlation_id);
    }
}

pub struct RpcClientBuilder<B: RpcBroker + 'static> {
    broker: Arc<B>,
    codec: EnvelopeCodec,
    call_timeout: Duration,
}

impl<B: RpcBroker + 'static> RpcClientBuilder<B> {
    /// Must match the codec of the servers being called.
    pub fn codec(mut self, codec: EnvelopeCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Declares the client's reply queue and starts reading it.
    pub async fn build(self) -> Result<RpcClient<B>, ConeyError> {
        let reply_queue = generate_queue_name(REPLY_QUEUE_PREFIX);
        self.broker.declare_queue(&reply_queue).await?;
        let replies = self.broker.consume(&reply_queue, 0).await?;

        tracing::debug!("Client listening for replies on {}", reply_queue);

        let pending = PendingCalls::default();
        let reply_task = tokio::spawn(RpcClient::<B>::reply_task(replies, pending.clone()));

        Ok(RpcClient {
            broker: self.broker,
            codec: self.codec,
            call_timeout: self.call_timeout,
            reply_queue,
            pending,
            reply_task,
        })
    }
}

/// Calls remote methods over a broker.
///
/// Each client owns a private reply queue. Requests carry a fresh
/// correlation token and the reply queue's name; a background task routes
/// every reply back to the call holding its token. Calls that outlive the
/// call timeout fail with [`ConeyError::CallTimeout`], and a reply arriving
/// after that is discarded.
pub struct RpcClient<B: RpcBroker + 'static> {
    broker: Arc<B>,
    codec: EnvelopeCodec,
    call_timeout: Duration,
    reply_queue: String,
    pending: PendingCalls,
    reply_task: JoinHandle<()>,
}

impl<B: RpcBroker + 'static> RpcClient<B> {
    pub fn builder(broker: Arc<B>) -> RpcClientBuilder<B> {
        RpcClientBuilder {
            broker,
            codec: EnvelopeCodec::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// A client with the default codec and call timeout.
    pub async fn new(broker: Arc<B>) -> Result<Self, ConeyError> {
        Self::builder(broker).build().await
    }

    pub fn reply_queue(&self) -> &str {
        &self.reply_queue
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Number of calls still waiting for a reply.
    pub fn pending_calls(&self) -> usize {
        self.pending.lock().len()
    }

    pub async fn call(
        &self,
        method_name: &str,
        version: impl Into<RpcVersion>,
        arguments: RpcArguments,
    ) -> Result<Value, ConeyError> {
        self.call_with_metadata(method_name, version, RpcMetadata::new(), arguments)
            .await
    }

    pub async fn call_with_metadata(
        &self,
        method_name: &str,
        version: impl Into<RpcVersion>,
        metadata: RpcMetadata,
        arguments: RpcArguments,
    ) -> Result<Value, ConeyError> {
        let version = version.into();
        let payload = self.codec.encode(&version, &metadata, &arguments)?;
        let correlation_id = generate_correlation_id();

        let (_pending_call, reply_rx) = self.pending.register(&correlation_id);

        tracing::trace!(
            "Calling {} v{} with correlation id {}",
            method_name,
            version,
            correlation_id
        );

        let request = RpcOutboundMessage::request(
            method_name,
            correlation_id.clone(),
            self.reply_queue.clone(),
            payload,
        );
        if let Err(err) = self.broker.publish(request).await {
            tracing::error!("Failed to publish call to {}: {}", method_name, err);
            return Err(err.into());
        }

        let reply = match tokio::time::timeout(self.call_timeout, reply_rx).await {
            Ok(Ok(reply)) => reply,
            // The reply task is gone, so the reply queue is no longer read.
            Ok(Err(_)) => return Err(BrokerError::Closed.into()),
            Err(_) => {
                return Err(ConeyError::CallTimeout {
                    method: method_name.to_string(),
                    timeout: self.call_timeout,
                });
            }
        };

        let response = self.codec.decode_response(&reply)?;
        tracing::debug!("Reply from {}: {}", method_name, response.code());

        response_to_result(method_name, &version, response)
    }

    /// Acknowledges every reply and hands it to the call waiting on its token.
    async fn reply_task(mut replies: RpcConsumer, pending: PendingCalls) {
        while let Some(delivery) = replies.next().await {
            let correlation_id = delivery.correlation_id().map(str::to_string);
            let payload = Bytes::copy_from_slice(delivery.payload());

            if let Err(err) = delivery.ack().await {
                tracing::error!("Failed to acknowledge reply: {}", err);
            }

            let Some(correlation_id) = correlation_id else {
                tracing::warn!("Dropping reply without a correlation id");
                continue;
            };

            match pending.take(&correlation_id) {
                Some(reply_tx) => {
                    let _ = reply_tx.send(payload);
                }
                None => {
                    tracing::debug!("Dropping late or unknown reply {}", correlation_id);
                }
            }
        }

        tracing::debug!("Reply queue closed");
    }
}

impl<B: RpcBroker + 'static> Drop for RpcClient<B> {
    fn drop(&mut self) {
        self.reply_task.abort();
    }
}

#[async_trait::async_trait]
impl<B: RpcBroker + 'static> RpcClientInterface for RpcClient<B> {
    async fn call_rpc(
        &self,
        method_name: &str,
        version: RpcVersion,
        metadata: RpcMetadata,
        arguments: RpcArguments,
    ) -> Result<Value, ConeyError> {
        self.call_with_metadata(method_name, version, metadata, arguments)
            .await
    }
}
