use coney::rpc::RpcVersion;
use coney_rpc_service::RpcMethod;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DivideInput {
    pub numerator: f64,
    pub denominator: f64,
}

/// Divides `numerator` by `denominator`.
///
/// Servers are expected to reject a zero denominator with a
/// `RemoteExecError` rather than return infinity.
pub struct Divide;

impl RpcMethod for Divide {
    const METHOD_NAME: &'static str = "math.divide";
    const VERSION: RpcVersion = RpcVersion::Number(1);

    type Input = DivideInput;
    type Output = f64;
}
