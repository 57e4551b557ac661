mod envelope_error;
mod remote_exec_error;
mod rpc_dispatch_outcome;
mod rpc_dispatcher;
mod rpc_handler;
mod rpc_handler_registry;
mod rpc_request;
mod rpc_response;
mod rpc_response_code;
mod rpc_version;

pub use envelope_error::EnvelopeError;
pub use remote_exec_error::RemoteExecError;
pub use rpc_dispatch_outcome::DispatchOutcome;
pub use rpc_dispatcher::RpcDispatcher;
pub use rpc_handler::{
    RpcHandler, RpcHandlerError, RpcHandlerFuture, RpcHandlerResult, into_rpc_handler,
};
pub use rpc_handler_registry::{RpcHandlerRegistry, RpcRegistryError, RpcResolveError};
pub use rpc_request::RpcRequest;
pub use rpc_response::RpcResponse;
pub use rpc_response_code::RpcResponseCode;
pub use rpc_version::RpcVersion;

/// Out-of-band context attached to a request (tracing ids, caller identity, ...).
pub type RpcMetadata = serde_json::Map<String, serde_json::Value>;

/// Named parameters passed to a handler. Keys are unique by construction.
pub type RpcArguments = serde_json::Map<String, serde_json::Value>;
