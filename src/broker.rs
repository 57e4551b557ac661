//! The message-broker capability the dispatcher and client are written against.
//!
//! Connection management, queue durability and delivery guarantees belong to
//! the implementation behind [`RpcBroker`]; the RPC layer only needs to
//! consume payloads with a reply address and correlation token, publish
//! payloads, and acknowledge what it consumed.

mod broker_error;
mod rpc_broker;
mod rpc_delivery;
mod rpc_outbound_message;

pub use broker_error::BrokerError;
pub use rpc_broker::{RpcBroker, RpcConsumer};
pub use rpc_delivery::{RpcAcknowledger, RpcDelivery};
pub use rpc_outbound_message::RpcOutboundMessage;
