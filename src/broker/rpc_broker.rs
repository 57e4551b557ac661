use super::{BrokerError, RpcDelivery, RpcOutboundMessage};
use futures::stream::BoxStream;

/// Deliveries from one queue, in broker order.
///
/// The stream yields no more than the consumer's prefetch count of
/// unacknowledged deliveries; it resumes once earlier ones are acknowledged.
pub type RpcConsumer = BoxStream<'static, RpcDelivery>;

#[async_trait::async_trait]
pub trait RpcBroker: Send + Sync {
    /// Creates `queue` if it does not exist yet. Idempotent.
    async fn declare_queue(&self, queue: &str) -> Result<(), BrokerError>;

    /// Starts consuming `queue`.
    ///
    /// `prefetch_count` bounds how many deliveries may be outstanding
    /// (handed out but not acknowledged) at once; `0` means unbounded.
    async fn consume(&self, queue: &str, prefetch_count: u16) -> Result<RpcConsumer, BrokerError>;

    /// Publishes a message to the queue named by its routing key.
    async fn publish(&self, message: RpcOutboundMessage) -> Result<(), BrokerError>;
}
