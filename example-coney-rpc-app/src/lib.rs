use coney::rpc::{RemoteExecError, RpcRegistryError};
use coney_rpc_service::RpcHandlerRegistrar;
use example_coney_rpc_service_definition::{Add, AddMany, Divide, Echo};

/// Registers handlers for every example method definition.
pub fn register_example_handlers<R>(registrar: &mut R) -> Result<(), RpcRegistryError>
where
    R: RpcHandlerRegistrar,
{
    registrar.register_method::<Echo, _, _>(|input| async move { Ok(input.x) })?;

    registrar.register_method::<Add, _, _>(|input| async move { Ok(input.a + input.b) })?;

    registrar.register_method::<AddMany, _, _>(|input| async move {
        Ok(input.numbers.iter().sum())
    })?;

    registrar.register_method::<Divide, _, _>(|input| async move {
        if input.denominator == 0.0 {
            return Err(RemoteExecError::new("denominator must not be zero").into());
        }
        Ok(input.numerator / input.denominator)
    })?;

    Ok(())
}
