//! Note: This `RpcServer` does not include authentication or authorization
//! mechanisms; it trusts whatever the broker delivers. Any code that owns an
//! [`RpcDispatcher`] and a consumer can act as a "server"; this
//! implementation demonstrates one way to do so on the Tokio runtime.

use coney::ConeyError;
use coney::broker::{RpcBroker, RpcConsumer};
use coney::codec::EnvelopeCodec;
use coney::constants::DEFAULT_PREFETCH_COUNT;
use coney::rpc::{RpcArguments, RpcDispatcher, RpcHandlerRegistry, RpcHandlerResult, RpcVersion};
use coney_rpc_service::RpcHandlerRegistrar;
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle, JoinSet};

/// Binds registered handlers to broker queues and serves them.
///
/// Startup happens in two phases. Handlers are registered while the server
/// is exclusively owned; [`serve`](Self::serve) then freezes the registry,
/// declares one queue per method name, and starts one consumer per queue.
pub struct RpcServer<B: RpcBroker + 'static> {
    broker: Arc<B>,
    registry: RpcHandlerRegistry,
    codec: EnvelopeCodec,
    prefetch_count: u16,
}

impl<B: RpcBroker + 'static> RpcServer<B> {
    pub fn new(broker: Arc<B>) -> Self {
        RpcServer {
            broker,
            registry: RpcHandlerRegistry::new(),
            codec: EnvelopeCodec::default(),
            prefetch_count: DEFAULT_PREFETCH_COUNT,
        }
    }

    /// Replaces the default JSON codec. Clients must use a matching one.
    pub fn with_codec(mut self, codec: EnvelopeCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Sets how many unacknowledged deliveries each method may hold; `0`
    /// removes the bound.
    pub fn with_prefetch_count(mut self, prefetch_count: u16) -> Self {
        self.prefetch_count = prefetch_count;
        self
    }

    pub fn registry(&self) -> &RpcHandlerRegistry {
        &self.registry
    }

    /// Registers an untyped handler. See [`RpcHandlerRegistrar::register_method`]
    /// for the typed form.
    pub fn register_handler<F, Fut>(
        &mut self,
        method_name: &str,
        version: impl Into<RpcVersion>,
        handler: F,
    ) -> Result<(), ConeyError>
    where
        F: Fn(RpcArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RpcHandlerResult> + Send + 'static,
    {
        Ok(self
            .registry
            .register_handler(method_name, version, handler)?)
    }

    /// Declares and starts consuming every method queue.
    ///
    /// Returns once all consumers are running. Each delivery is handled in
    /// its own task, so a method processes up to its prefetch count of
    /// deliveries concurrently.
    pub async fn serve(self) -> Result<RpcServerHandle, ConeyError> {
        let RpcServer {
            broker,
            registry,
            codec,
            prefetch_count,
        } = self;

        if registry.is_empty() {
            tracing::warn!("Serving with no registered handlers");
        }

        // Every binding is opened before any consumer starts, so a failed
        // binding leaves nothing running.
        let mut consumers = Vec::new();
        for method_name in registry.method_names() {
            broker.declare_queue(method_name).await?;
            let consumer = broker.consume(method_name, prefetch_count).await?;
            consumers.push((method_name.to_string(), consumer));
        }

        let registry = Arc::new(registry);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut bindings = Vec::new();
        let mut tasks = Vec::new();

        for (method_name, consumer) in consumers {
            tracing::info!(
                "Bound {} (versions: {:?}) with prefetch count {}",
                method_name,
                registry.versions(&method_name),
                prefetch_count
            );

            let dispatcher = RpcDispatcher::new(&method_name, registry.clone(), codec.clone());
            tasks.push(tokio::spawn(Self::consumer_task(
                dispatcher,
                broker.clone(),
                consumer,
                shutdown_rx.clone(),
            )));
            bindings.push(method_name);
        }

        Ok(RpcServerHandle {
            bindings,
            shutdown_tx,
            tasks,
        })
    }

    /// Serves until every consumer stream ends.
    pub async fn run(self) -> Result<(), ConeyError> {
        self.serve().await?.join().await;
        Ok(())
    }

    /// Pulls deliveries for one method and hands each to its own task.
    ///
    /// On exit, waits for every dispatch it started to reply and acknowledge.
    async fn consumer_task(
        dispatcher: RpcDispatcher,
        broker: Arc<B>,
        mut consumer: RpcConsumer,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                Ok(()) = shutdown.changed() => {
                    tracing::info!("Stopping consumer for {}", dispatcher.method_name());
                    break;
                }

                Some(finished) = in_flight.join_next(), if !in_flight.is_empty() => {
                    Self::log_dispatch_failure(&dispatcher, finished);
                }

                next = consumer.next() => match next {
                    Some(delivery) => {
                        let dispatcher = dispatcher.clone();
                        let broker = broker.clone();
                        in_flight.spawn(async move {
                            dispatcher.handle_delivery(delivery, broker.as_ref()).await;
                        });
                    }
                    None => {
                        tracing::info!("Consumer for {} ended", dispatcher.method_name());
                        break;
                    }
                }
            }
        }

        drop(consumer);
        if !in_flight.is_empty() {
            tracing::debug!(
                "Waiting on {} in-flight deliveries for {}",
                in_flight.len(),
                dispatcher.method_name()
            );
        }
        while let Some(finished) = in_flight.join_next().await {
            Self::log_dispatch_failure(&dispatcher, finished);
        }
    }

    fn log_dispatch_failure(dispatcher: &RpcDispatcher, finished: Result<(), JoinError>) {
        if let Err(err) = finished {
            tracing::error!("Dispatch task for {} failed: {}", dispatcher.method_name(), err);
        }
    }
}

impl<B: RpcBroker + 'static> RpcHandlerRegistrar for RpcServer<B> {
    fn handler_registry_mut(&mut self) -> &mut RpcHandlerRegistry {
        &mut self.registry
    }
}

/// A running server.
///
/// Dropping the handle leaves the consumers running.
#[derive(Debug)]
pub struct RpcServerHandle {
    bindings: Vec<String>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl RpcServerHandle {
    /// Method names with a running consumer, in registration order.
    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    /// Stops pulling new deliveries and waits for the consumers to exit.
    ///
    /// Deliveries already handed to a handler are replied to and
    /// acknowledged before this returns.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        self.join().await;
    }

    async fn join(self) {
        for task in self.tasks {
            if let Err(err) = task.await {
                tracing::error!("Consumer task failed: {}", err);
            }
        }
    }
}
