use super::{RemoteExecError, RpcResolveError, RpcResponse, RpcResponseCode, RpcVersion};
use crate::codec::MalformedRequest;
use serde_json::Value;

/// Where a dispatch cycle ended up.
///
/// Each stage of dispatch (decode, resolve, execute) either hands over to the
/// next stage or stops with one of these variants; the final variant is then
/// folded into the [`RpcResponse`] sent back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The handler returned a value.
    Executed(Value),

    /// The payload could not be decoded into a request.
    Malformed(MalformedRequest),

    MethodNotFound {
        method: String,
    },

    VersionNotFound {
        method: String,
        version: RpcVersion,
    },

    /// The handler reported a deliberate failure.
    RemoteError(RemoteExecError),

    /// The handler failed in any other way, including a panic. Holds the
    /// summary that is sent on the wire.
    Unexpected(String),
}

impl DispatchOutcome {
    pub fn response_code(&self) -> RpcResponseCode {
        match self {
            DispatchOutcome::Executed(_) => RpcResponseCode::Success,
            DispatchOutcome::Malformed(_) => RpcResponseCode::MalformedRequest,
            DispatchOutcome::MethodNotFound { .. } => RpcResponseCode::MethodNotFound,
            DispatchOutcome::VersionNotFound { .. } => RpcResponseCode::VersionNotFound,
            DispatchOutcome::RemoteError(err) => err.code(),
            DispatchOutcome::Unexpected(_) => RpcResponseCode::UnexpectedDispatchException,
        }
    }
}

impl From<MalformedRequest> for DispatchOutcome {
    fn from(err: MalformedRequest) -> Self {
        DispatchOutcome::Malformed(err)
    }
}

impl From<RpcResolveError> for DispatchOutcome {
    fn from(err: RpcResolveError) -> Self {
        match err {
            RpcResolveError::MethodNotFound { method } => DispatchOutcome::MethodNotFound { method },
            RpcResolveError::VersionNotFound { method, version } => {
                DispatchOutcome::VersionNotFound { method, version }
            }
        }
    }
}

impl From<DispatchOutcome> for RpcResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        let code = outcome.response_code();
        match outcome {
            DispatchOutcome::Executed(value) => RpcResponse::success(value),
            DispatchOutcome::Malformed(_)
            | DispatchOutcome::MethodNotFound { .. }
            | DispatchOutcome::VersionNotFound { .. } => RpcResponse::from_code(code),
            DispatchOutcome::RemoteError(err) => {
                RpcResponse::failure(code, Some(err.details().to_string()))
            }
            DispatchOutcome::Unexpected(details) => RpcResponse::failure(code, Some(details)),
        }
    }
}
