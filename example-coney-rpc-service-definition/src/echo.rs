use coney::rpc::RpcVersion;
use coney_rpc_service::RpcMethod;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EchoInput {
    pub x: Value,
}

/// Returns its argument unchanged.
pub struct Echo;

impl RpcMethod for Echo {
    const METHOD_NAME: &'static str = "echo";
    const VERSION: RpcVersion = RpcVersion::Number(1);

    type Input = EchoInput;
    type Output = Value;
}
