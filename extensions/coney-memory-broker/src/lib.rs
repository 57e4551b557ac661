//! An in-process [`RpcBroker`](coney::broker::RpcBroker).
//!
//! Queues are unbounded tokio channels living inside the process. There is no
//! persistence, redelivery or clustering; the broker exists so servers and
//! clients can be wired together in tests, examples and benchmarks without
//! an external message broker.

mod memory_broker;
pub use memory_broker::*;

mod queue_stats;
pub use queue_stats::*;
