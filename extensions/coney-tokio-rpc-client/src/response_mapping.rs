use coney::ConeyError;
use coney::rpc::{RemoteExecError, RpcResponse, RpcResponseCode, RpcVersion};
use serde_json::Value;

/// Maps a decoded response to the caller's result.
///
/// Failure codes become the matching [`ConeyError`] variant, keeping the
/// remote details where the response carried them.
pub fn response_to_result(
    method_name: &str,
    version: &RpcVersion,
    response: RpcResponse,
) -> Result<Value, ConeyError> {
    let (code, details) = match response.into_result() {
        Ok(value) => return Ok(value),
        Err(failure) => failure,
    };

    Err(match code {
        RpcResponseCode::MethodNotFound => ConeyError::MethodNotFound {
            method: method_name.to_string(),
        },
        RpcResponseCode::VersionNotFound => ConeyError::VersionNotFound {
            method: method_name.to_string(),
            version: version.clone(),
        },
        RpcResponseCode::MalformedRequest => ConeyError::RequestRejected { code },
        RpcResponseCode::RemoteExecError => {
            ConeyError::RemoteExecError(RemoteExecError::new(details.unwrap_or_default()))
        }
        // Unexpected dispatch exceptions and remote unhandled exceptions.
        code => ConeyError::RemoteUnhandledException {
            code,
            details: details.unwrap_or_default(),
        },
    })
}
