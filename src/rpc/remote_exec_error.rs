use super::RpcResponseCode;

/// A deliberate failure reported by handler logic.
///
/// Handlers return this (boxed, like any other error) when a call fails for
/// a reason the caller is expected to understand, such as a rejected
/// argument. The dispatcher recognises it and forwards its code and details
/// to the caller instead of treating it as an unexpected failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("An error occurred during remote execution: {details}")]
pub struct RemoteExecError {
    code: RpcResponseCode,
    details: String,
}

impl RemoteExecError {
    pub fn new(details: impl Into<String>) -> Self {
        Self::with_code(RpcResponseCode::RemoteExecError, details)
    }

    /// Reports a failure under a specific response code.
    ///
    /// `Success` is not a failure code and is replaced with
    /// `RemoteExecError`.
    pub fn with_code(code: RpcResponseCode, details: impl Into<String>) -> Self {
        let code = match code {
            RpcResponseCode::Success => RpcResponseCode::RemoteExecError,
            code => code,
        };
        Self {
            code,
            details: details.into(),
        }
    }

    pub fn code(&self) -> RpcResponseCode {
        self.code
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}
