use crate::queue_stats::{QueueCounters, QueueStats};
use bytes::Bytes;
use coney::broker::{
    BrokerError, RpcAcknowledger, RpcBroker, RpcConsumer, RpcDelivery, RpcOutboundMessage,
};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore, mpsc};

struct QueuedMessage {
    payload: Bytes,
    reply_to: Option<String>,
    correlation_id: Option<String>,
}

struct MemoryQueue {
    sender: mpsc::UnboundedSender<QueuedMessage>,
    /// Taken by the first consumer; each queue has at most one.
    receiver: Option<mpsc::UnboundedReceiver<QueuedMessage>>,
    counters: Arc<QueueCounters>,
}

impl MemoryQueue {
    fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Some(receiver),
            counters: Arc::new(QueueCounters::default()),
        }
    }

    /// Consumed once, and that consumer has since gone away.
    fn is_abandoned(&self) -> bool {
        self.receiver.is_none() && self.sender.is_closed()
    }
}

#[derive(Default)]
struct BrokerState {
    queues: HashMap<String, MemoryQueue>,
    closed: bool,
}

impl BrokerState {
    fn remove_abandoned(&mut self) {
        self.queues.retain(|name, queue| {
            let keep = !queue.is_abandoned();
            if !keep {
                tracing::debug!("Removing abandoned queue {}", name);
            }
            keep
        });
    }
}

/// An in-process broker. Clones share the same queues.
///
/// Queues are created on first use, whether by declaration, consumption or
/// publication, so a request published before its server starts is held
/// until the server consumes it. A queue is deleted once its consumer goes
/// away, and a message published to it is dropped, as a broker does for an
/// auto-deleted reply queue. The name may then be consumed afresh.
#[derive(Clone, Default)]
pub struct MemoryBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `queue`, or `None` if it was never used.
    pub async fn queue_stats(&self, queue: &str) -> Option<QueueStats> {
        let state = self.state.lock().await;
        state.queues.get(queue).map(|q| q.counters.snapshot())
    }

    pub async fn queue_names(&self) -> Vec<String> {
        let state = self.state.lock().await;
        let mut names: Vec<_> = state.queues.keys().cloned().collect();
        names.sort();
        names
    }

    /// Drops every queue and refuses further use.
    ///
    /// Consumer streams end once they have drained what was already queued.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        state.closed = true;
        state.queues.clear();
        tracing::info!("Memory broker closed");
    }
}

#[async_trait::async_trait]
impl RpcBroker for MemoryBroker {
    async fn declare_queue(&self, queue: &str) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(BrokerError::Closed);
        }
        state.remove_abandoned();
        state
            .queues
            .entry(queue.to_string())
            .or_insert_with(MemoryQueue::new);
        Ok(())
    }

    async fn consume(&self, queue: &str, prefetch_count: u16) -> Result<RpcConsumer, BrokerError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(BrokerError::Closed);
        }
        state.remove_abandoned();
        let memory_queue = state
            .queues
            .entry(queue.to_string())
            .or_insert_with(MemoryQueue::new);
        let receiver = memory_queue
            .receiver
            .take()
            .ok_or_else(|| BrokerError::QueueAlreadyConsumed(queue.to_string()))?;

        tracing::debug!(
            "Consuming {} with prefetch count {}",
            queue,
            prefetch_count
        );

        let consumer = ConsumerState {
            receiver,
            prefetch: (prefetch_count > 0)
                .then(|| Arc::new(Semaphore::new(usize::from(prefetch_count)))),
            counters: memory_queue.counters.clone(),
        };

        Ok(futures::stream::unfold(consumer, ConsumerState::next_delivery).boxed())
    }

    async fn publish(&self, message: RpcOutboundMessage) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(BrokerError::Closed);
        }
        let routing_key = message.routing_key();
        if state.queues.get(routing_key).is_some_and(MemoryQueue::is_abandoned) {
            state.queues.remove(routing_key);
            tracing::debug!("Dropping message for {}: its consumer is gone", routing_key);
            return Ok(());
        }
        let memory_queue = state
            .queues
            .entry(routing_key.to_string())
            .or_insert_with(MemoryQueue::new);

        let queued = QueuedMessage {
            reply_to: message.reply_to().map(str::to_string),
            correlation_id: message.correlation_id().map(str::to_string),
            payload: message.payload().clone(),
        };
        if memory_queue.sender.send(queued).is_err() {
            tracing::debug!("Dropping message for {}: its consumer is gone", routing_key);
            return Ok(());
        }
        memory_queue.counters.record_published();
        Ok(())
    }
}

struct ConsumerState {
    receiver: mpsc::UnboundedReceiver<QueuedMessage>,
    /// `None` when the prefetch count is unbounded.
    prefetch: Option<Arc<Semaphore>>,
    counters: Arc<QueueCounters>,
}

impl ConsumerState {
    /// Waits for a free prefetch slot, then for the next message.
    async fn next_delivery(mut self) -> Option<(RpcDelivery, Self)> {
        let permit = match &self.prefetch {
            Some(semaphore) => Some(semaphore.clone().acquire_owned().await.ok()?),
            None => None,
        };
        let message = self.receiver.recv().await?;
        let delivery_tag = self.counters.record_delivered();

        let acker = MemoryAck {
            _permit: permit,
            counters: self.counters.clone(),
        };
        let delivery = RpcDelivery::new(
            delivery_tag,
            message.payload,
            message.reply_to,
            message.correlation_id,
            Box::new(acker),
        );
        Some((delivery, self))
    }
}

/// Frees the delivery's prefetch slot when acknowledged (or dropped).
struct MemoryAck {
    _permit: Option<OwnedSemaphorePermit>,
    counters: Arc<QueueCounters>,
}

#[async_trait::async_trait]
impl RpcAcknowledger for MemoryAck {
    async fn ack(self: Box<Self>) -> Result<(), BrokerError> {
        self.counters.record_acknowledged();
        Ok(())
    }
}
