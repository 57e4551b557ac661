use coney::rpc::RpcVersion;
use coney_rpc_service::RpcMethod;
use serde::{Deserialize, Serialize};

pub const ADD_METHOD_NAME: &str = "math.add";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddInput {
    pub a: f64,
    pub b: f64,
}

/// Adds two numbers.
pub struct Add;

impl RpcMethod for Add {
    const METHOD_NAME: &'static str = ADD_METHOD_NAME;
    const VERSION: RpcVersion = RpcVersion::Number(1);

    type Input = AddInput;
    type Output = f64;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddManyInput {
    pub numbers: Vec<f64>,
}

/// Version 2 of `math.add`: sums any number of operands.
///
/// Served from the same queue as [`Add`]; the request's version picks the
/// handler.
pub struct AddMany;

impl RpcMethod for AddMany {
    const METHOD_NAME: &'static str = ADD_METHOD_NAME;
    const VERSION: RpcVersion = RpcVersion::Number(2);

    type Input = AddManyInput;
    type Output = f64;
}
