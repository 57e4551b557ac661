use crate::broker::BrokerError;
use crate::codec::{CodecError, MalformedRequest};
use crate::rpc::{RemoteExecError, RpcRegistryError, RpcResolveError, RpcResponseCode, RpcVersion};
use std::time::Duration;

/// Every error surfaced by Coney to application code.
///
/// Dispatch-side failures never reach this type on the server; they are
/// converted into responses. Clients see them here once the response has
/// been mapped back into an error.
#[derive(Debug, thiserror::Error)]
pub enum ConeyError {
    #[error("An RPC call to {method} did not return before the time out period ({timeout:?})")]
    CallTimeout { method: String, timeout: Duration },

    #[error(transparent)]
    MalformedRequest(#[from] MalformedRequest),

    #[error("method {method} is not registered")]
    MethodNotFound { method: String },

    #[error("method {method} has no handler for version {version}")]
    VersionNotFound { method: String, version: RpcVersion },

    /// The server could not decode the request it was sent.
    #[error("the remote rejected the request: {code}")]
    RequestRejected { code: RpcResponseCode },

    #[error(transparent)]
    RemoteExecError(#[from] RemoteExecError),

    #[error("An unhandled exception was raised during remote execution: {details}")]
    RemoteUnhandledException {
        code: RpcResponseCode,
        details: String,
    },

    #[error(transparent)]
    Registry(#[from] RpcRegistryError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// Typed arguments or results did not convert to or from their dynamic form.
    #[error("value conversion failed: {0}")]
    Conversion(#[from] serde_json::Error),
}

/// Stable, matchable classification of a [`ConeyError`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ConeyErrorKind {
    CallTimeout,
    MalformedRequest,
    MethodNotFound,
    VersionNotFound,
    RequestRejected,
    RemoteExecError,
    RemoteUnhandledException,
    InvalidMethodName,
    Codec,
    Broker,
    Conversion,
}

impl ConeyErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConeyErrorKind::CallTimeout => "CallTimeout",
            ConeyErrorKind::MalformedRequest => "MalformedRequest",
            ConeyErrorKind::MethodNotFound => "MethodNotFound",
            ConeyErrorKind::VersionNotFound => "VersionNotFound",
            ConeyErrorKind::RequestRejected => "RequestRejected",
            ConeyErrorKind::RemoteExecError => "RemoteExecError",
            ConeyErrorKind::RemoteUnhandledException => "RemoteUnhandledException",
            ConeyErrorKind::InvalidMethodName => "InvalidMethodName",
            ConeyErrorKind::Codec => "Codec",
            ConeyErrorKind::Broker => "Broker",
            ConeyErrorKind::Conversion => "Conversion",
        }
    }
}

impl std::fmt::Display for ConeyErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConeyError {
    pub fn kind(&self) -> ConeyErrorKind {
        match self {
            ConeyError::CallTimeout { .. } => ConeyErrorKind::CallTimeout,
            ConeyError::MalformedRequest(_) => ConeyErrorKind::MalformedRequest,
            ConeyError::MethodNotFound { .. } => ConeyErrorKind::MethodNotFound,
            ConeyError::VersionNotFound { .. } => ConeyErrorKind::VersionNotFound,
            ConeyError::RequestRejected { .. } => ConeyErrorKind::RequestRejected,
            ConeyError::RemoteExecError(_) => ConeyErrorKind::RemoteExecError,
            ConeyError::RemoteUnhandledException { .. } => ConeyErrorKind::RemoteUnhandledException,
            ConeyError::Registry(RpcRegistryError::InvalidMethodName(_)) => {
                ConeyErrorKind::InvalidMethodName
            }
            ConeyError::Codec(_) => ConeyErrorKind::Codec,
            ConeyError::Broker(_) => ConeyErrorKind::Broker,
            ConeyError::Conversion(_) => ConeyErrorKind::Conversion,
        }
    }

    /// The response code a remote failure arrived with, if any.
    pub fn response_code(&self) -> Option<RpcResponseCode> {
        match self {
            ConeyError::MethodNotFound { .. } => Some(RpcResponseCode::MethodNotFound),
            ConeyError::VersionNotFound { .. } => Some(RpcResponseCode::VersionNotFound),
            ConeyError::RequestRejected { code } => Some(*code),
            ConeyError::RemoteExecError(err) => Some(err.code()),
            ConeyError::RemoteUnhandledException { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<RpcResolveError> for ConeyError {
    fn from(err: RpcResolveError) -> Self {
        match err {
            RpcResolveError::MethodNotFound { method } => ConeyError::MethodNotFound { method },
            RpcResolveError::VersionNotFound { method, version } => {
                ConeyError::VersionNotFound { method, version }
            }
        }
    }
}
