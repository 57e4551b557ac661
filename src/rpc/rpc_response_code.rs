use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Outcome class of a dispatch cycle, carried in every response.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, TryFromPrimitive, IntoPrimitive)]
pub enum RpcResponseCode {
    #[default]
    Success = 0,
    MalformedRequest = 1,
    MethodNotFound = 2,
    VersionNotFound = 3,
    UnexpectedDispatchException = 4,
    RemoteExecError = 5,
    RemoteUnhandledException = 6,
}

/// Identifier and description of every code, indexed by discriminant.
const RESPONSE_CODE_TABLE: [(RpcResponseCode, &str, &str); 7] = [
    (
        RpcResponseCode::Success,
        "SUCCESS",
        "The method executed and returned a value",
    ),
    (
        RpcResponseCode::MalformedRequest,
        "MALFORMED_REQUEST",
        "The request payload could not be decoded into a version, metadata and arguments",
    ),
    (
        RpcResponseCode::MethodNotFound,
        "METHOD_NOT_FOUND",
        "No handler is registered for the requested method",
    ),
    (
        RpcResponseCode::VersionNotFound,
        "VERSION_NOT_FOUND",
        "The method exists but has no handler for the requested version",
    ),
    (
        RpcResponseCode::UnexpectedDispatchException,
        "UNEXPECTED_DISPATCH_EXCEPTION",
        "The handler failed unexpectedly while executing",
    ),
    (
        RpcResponseCode::RemoteExecError,
        "REMOTE_EXEC_ERROR",
        "The handler reported an error during remote execution",
    ),
    (
        RpcResponseCode::RemoteUnhandledException,
        "REMOTE_UNHANDLED_EXCEPTION",
        "The handler reported an unhandled exception during remote execution",
    ),
];

impl RpcResponseCode {
    pub const ALL: [RpcResponseCode; 7] = [
        RpcResponseCode::Success,
        RpcResponseCode::MalformedRequest,
        RpcResponseCode::MethodNotFound,
        RpcResponseCode::VersionNotFound,
        RpcResponseCode::UnexpectedDispatchException,
        RpcResponseCode::RemoteExecError,
        RpcResponseCode::RemoteUnhandledException,
    ];

    #[inline]
    pub fn value(self) -> u8 {
        self.into()
    }

    /// Stable upper-snake identifier, e.g. `"METHOD_NOT_FOUND"`.
    pub fn identifier(self) -> &'static str {
        RESPONSE_CODE_TABLE[self as usize].1
    }

    /// Human-readable meaning of the code, used in log lines.
    pub fn describe(self) -> &'static str {
        RESPONSE_CODE_TABLE[self as usize].2
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        RESPONSE_CODE_TABLE
            .iter()
            .find(|(_, id, _)| *id == identifier)
            .map(|(code, _, _)| *code)
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self == RpcResponseCode::Success
    }
}

impl fmt::Display for RpcResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.identifier(), self.value())
    }
}
