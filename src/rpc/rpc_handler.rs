use super::RpcArguments;
use serde_json::Value;
use std::{future::Future, pin::Pin, sync::Arc};

/// Any failure a handler can report.
///
/// Return a boxed [`RemoteExecError`](super::RemoteExecError) to report a
/// deliberate failure; anything else is treated as unexpected.
pub type RpcHandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type RpcHandlerResult = Result<Value, RpcHandlerError>;

pub type RpcHandlerFuture = Pin<Box<dyn Future<Output = RpcHandlerResult> + Send>>;

/// A registered, type-erased handler. Invoked with the request's arguments.
pub type RpcHandler = Arc<dyn Fn(RpcArguments) -> RpcHandlerFuture + Send + Sync>;

/// Erases an async closure into an [`RpcHandler`].
pub fn into_rpc_handler<F, Fut>(handler: F) -> RpcHandler
where
    F: Fn(RpcArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RpcHandlerResult> + Send + 'static,
{
    Arc::new(move |arguments: RpcArguments| Box::pin(handler(arguments)) as RpcHandlerFuture)
}
