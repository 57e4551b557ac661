use super::{RpcClientInterface, RpcMethod};
use coney::ConeyError;
use coney::rpc::RpcMetadata;

/// Performs a typed call of `T` through any [`RpcClientInterface`].
///
/// Handles the full lifecycle of encoding the input into named arguments,
/// sending the request, and decoding the returned value into `T::Output`.
pub async fn call_rpc_method<T, C>(rpc_client: &C, input: T::Input) -> Result<T::Output, ConeyError>
where
    T: RpcMethod + Send + Sync + 'static,
    C: RpcClientInterface + ?Sized,
{
    call_rpc_method_with_metadata::<T, C>(rpc_client, RpcMetadata::new(), input).await
}

pub async fn call_rpc_method_with_metadata<T, C>(
    rpc_client: &C,
    metadata: RpcMetadata,
    input: T::Input,
) -> Result<T::Output, ConeyError>
where
    T: RpcMethod + Send + Sync + 'static,
    C: RpcClientInterface + ?Sized,
{
    let arguments = T::encode_arguments(&input)?;
    let value = rpc_client
        .call_rpc(T::METHOD_NAME, T::VERSION, metadata, arguments)
        .await?;

    Ok(T::decode_output(value)?)
}

/// Lets downstream code write `Method::call(&client, input)`.
///
/// Blanket-implemented for every [`RpcMethod`], so method definitions never
/// implement it by hand.
#[async_trait::async_trait]
pub trait RpcCall: RpcMethod + Sized + Send + Sync {
    async fn call<C>(rpc_client: &C, input: Self::Input) -> Result<Self::Output, ConeyError>
    where
        C: RpcClientInterface + ?Sized;
}

#[async_trait::async_trait]
impl<T> RpcCall for T
where
    T: RpcMethod + Send + Sync + 'static,
{
    async fn call<C>(rpc_client: &C, input: Self::Input) -> Result<Self::Output, ConeyError>
    where
        C: RpcClientInterface + ?Sized,
    {
        call_rpc_method::<T, C>(rpc_client, input).await
    }
}
