use super::RpcMethod;
use coney::rpc::{RpcArguments, RpcHandlerError, RpcHandlerRegistry, RpcRegistryError};
use std::future::Future;
use std::sync::Arc;

/// Anything that owns a handler registry during startup.
///
/// Provides typed registration on top of the registry's dynamic handlers.
pub trait RpcHandlerRegistrar {
    fn handler_registry_mut(&mut self) -> &mut RpcHandlerRegistry;

    /// Registers a typed handler for `M`.
    ///
    /// Arguments that do not deserialize into `M::Input` fail the call as an
    /// unexpected dispatch error, the same way a handler invoked with the
    /// wrong parameters would.
    fn register_method<M, F, Fut>(&mut self, handler: F) -> Result<(), RpcRegistryError>
    where
        M: RpcMethod + 'static,
        F: Fn(M::Input) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<M::Output, RpcHandlerError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        self.handler_registry_mut().register_handler(
            M::METHOD_NAME,
            M::VERSION,
            move |arguments: RpcArguments| {
                let handler = handler.clone();
                async move {
                    let input = M::decode_arguments(arguments)?;
                    let output = handler(input).await?;
                    Ok(M::encode_output(&output)?)
                }
            },
        )
    }
}

impl RpcHandlerRegistrar for RpcHandlerRegistry {
    fn handler_registry_mut(&mut self) -> &mut RpcHandlerRegistry {
        self
    }
}
