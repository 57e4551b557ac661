#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("queue {0} does not exist")]
    QueueNotFound(String),

    /// The broker only supports one consumer per queue.
    #[error("queue {0} already has a consumer")]
    QueueAlreadyConsumed(String),

    #[error("broker connection is closed")]
    Closed,

    #[error("transport error: {0}")]
    Transport(String),
}
