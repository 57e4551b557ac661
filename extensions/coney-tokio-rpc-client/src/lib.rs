mod rpc_client;
pub use rpc_client::{RpcClient, RpcClientBuilder};

mod response_mapping;
pub use response_mapping::response_to_result;

pub use coney_rpc_service::{RpcCall, RpcClientInterface};
