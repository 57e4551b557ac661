use coney::ConeyError;
use coney::rpc::{RpcArguments, RpcMetadata, RpcVersion};
use serde_json::Value;

/// A transport-agnostic RPC client.
///
/// Implementations encode the request, route it to the queue bound to
/// `method_name`, wait for the correlated reply, and map a failed response to
/// the matching [`ConeyError`].
#[async_trait::async_trait]
pub trait RpcClientInterface: Send + Sync {
    async fn call_rpc(
        &self,
        method_name: &str,
        version: RpcVersion,
        metadata: RpcMetadata,
        arguments: RpcArguments,
    ) -> Result<Value, ConeyError>;
}
