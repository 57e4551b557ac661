mod rpc_server;
pub use rpc_server::*;

pub use coney_rpc_service::RpcHandlerRegistrar;
