use super::BrokerError;
use bytes::Bytes;
use std::fmt;

/// Acknowledges a single delivery back to the broker.
#[async_trait::async_trait]
pub trait RpcAcknowledger: Send + Sync {
    async fn ack(self: Box<Self>) -> Result<(), BrokerError>;
}

/// One consumed message.
///
/// Acknowledging consumes the delivery, so a message cannot be acknowledged
/// twice.
pub struct RpcDelivery {
    delivery_tag: u64,
    payload: Bytes,
    reply_to: Option<String>,
    correlation_id: Option<String>,
    acker: Box<dyn RpcAcknowledger>,
}

impl RpcDelivery {
    pub fn new(
        delivery_tag: u64,
        payload: Bytes,
        reply_to: Option<String>,
        correlation_id: Option<String>,
        acker: Box<dyn RpcAcknowledger>,
    ) -> Self {
        Self {
            delivery_tag,
            payload,
            reply_to,
            correlation_id,
            acker,
        }
    }

    pub fn delivery_tag(&self) -> u64 {
        self.delivery_tag
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn reply_to(&self) -> Option<&str> {
        self.reply_to.as_deref()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub async fn ack(self) -> Result<(), BrokerError> {
        self.acker.ack().await
    }
}

impl fmt::Debug for RpcDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcDelivery")
            .field("delivery_tag", &self.delivery_tag)
            .field("reply_to", &self.reply_to)
            .field("correlation_id", &self.correlation_id)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
