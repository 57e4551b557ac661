use coney::rpc::{RpcArguments, RpcVersion};
use serde::{Serialize, de::DeserializeOwned, ser::Error as _};
use serde_json::Value;

/// Couples a method's name and version with its input and output types.
///
/// The input type is serialized into the request's named arguments, so it
/// must serialize to a map (typically a struct whose fields are the
/// parameter names). Both sides of a call share the same definition, which
/// keeps the wire contract in one place.
pub trait RpcMethod {
    /// Queue the method is served on.
    const METHOD_NAME: &'static str;

    const VERSION: RpcVersion;

    type Input: Serialize + DeserializeOwned + Send + 'static;

    type Output: Serialize + DeserializeOwned + Send + 'static;

    /// Converts the typed input into named arguments.
    fn encode_arguments(input: &Self::Input) -> Result<RpcArguments, serde_json::Error> {
        match serde_json::to_value(input)? {
            Value::Object(arguments) => Ok(arguments),
            _ => Err(serde_json::Error::custom(format!(
                "arguments of {} must serialize to a map",
                Self::METHOD_NAME
            ))),
        }
    }

    /// Reads the typed input back out of named arguments.
    fn decode_arguments(arguments: RpcArguments) -> Result<Self::Input, serde_json::Error> {
        serde_json::from_value(Value::Object(arguments))
    }

    fn encode_output(output: &Self::Output) -> Result<Value, serde_json::Error> {
        serde_json::to_value(output)
    }

    fn decode_output(value: Value) -> Result<Self::Output, serde_json::Error> {
        serde_json::from_value(value)
    }
}
