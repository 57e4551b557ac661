use super::envelope_error::value_kind;
use super::{EnvelopeError, RpcResponseCode};
use crate::constants::{RESPONSE_ENVELOPE_MAX_LEN, RESPONSE_ENVELOPE_MIN_LEN};
use serde_json::Value;

/// The reply to exactly one request.
///
/// A successful response carries the handler's value and never any details;
/// a failed response carries no value and optionally a diagnostic string.
/// The constructors are the only way to build one, which keeps the two
/// shapes apart.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    value: Option<Value>,
    code: RpcResponseCode,
    details: Option<String>,
}

impl Default for RpcResponse {
    fn default() -> Self {
        Self::success(Value::Null)
    }
}

impl RpcResponse {
    pub fn success(value: Value) -> Self {
        Self {
            value: Some(value),
            code: RpcResponseCode::Success,
            details: None,
        }
    }

    /// Builds a failed response.
    ///
    /// Passing `Success` here is a caller bug; it is recorded as
    /// `RemoteExecError` so the response can never claim success without a
    /// value.
    pub fn failure(code: RpcResponseCode, details: Option<String>) -> Self {
        let code = match code {
            RpcResponseCode::Success => RpcResponseCode::RemoteExecError,
            code => code,
        };
        Self {
            value: None,
            code,
            details,
        }
    }

    pub fn from_code(code: RpcResponseCode) -> Self {
        Self::failure(code, None)
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn code(&self) -> RpcResponseCode {
        self.code
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Splits a response into the handler's value or the failure code and details.
    pub fn into_result(self) -> Result<Value, (RpcResponseCode, Option<String>)> {
        match self.value {
            Some(value) if self.code.is_success() => Ok(value),
            _ => Err((self.code, self.details)),
        }
    }

    /// The `[value, code]` or `[value, code, details]` form handed to the serializer.
    pub fn to_envelope(&self) -> Value {
        let mut elements = vec![
            self.value.clone().unwrap_or(Value::Null),
            Value::from(self.code.value()),
        ];
        if let Some(details) = &self.details {
            elements.push(Value::String(details.clone()));
        }
        Value::Array(elements)
    }

    pub fn from_envelope(envelope: Value) -> Result<Self, EnvelopeError> {
        let mut elements = match envelope {
            Value::Array(elements) => elements,
            other => {
                return Err(EnvelopeError::NotASequence {
                    found: value_kind(&other),
                });
            }
        };

        if !(RESPONSE_ENVELOPE_MIN_LEN..=RESPONSE_ENVELOPE_MAX_LEN).contains(&elements.len()) {
            return Err(EnvelopeError::ElementCount {
                expected: "2 or 3",
                found: elements.len(),
            });
        }

        let code = elements[1]
            .as_u64()
            .and_then(|raw| u8::try_from(raw).ok())
            .and_then(|raw| RpcResponseCode::try_from(raw).ok())
            .ok_or_else(|| EnvelopeError::UnknownResponseCode(elements[1].to_string()))?;

        let details = match elements.get_mut(2).map(Value::take) {
            None | Some(Value::Null) => None,
            Some(Value::String(details)) => Some(details),
            Some(other) => {
                return Err(EnvelopeError::InvalidDetails {
                    found: value_kind(&other),
                });
            }
        };

        if code.is_success() {
            Ok(Self::success(elements[0].take()))
        } else {
            Ok(Self::failure(code, details))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_envelope_has_null_value() {
        let response = RpcResponse::failure(
            RpcResponseCode::UnexpectedDispatchException,
            Some("boom".into()),
        );
        assert_eq!(response.to_envelope(), json!([null, 4, "boom"]));
    }

    #[test]
    fn success_envelope_omits_details() {
        assert_eq!(RpcResponse::success(json!(42)).to_envelope(), json!([42, 0]));
    }

    #[test]
    fn failure_never_claims_success() {
        let response = RpcResponse::failure(RpcResponseCode::Success, Some("oops".into()));
        assert_eq!(response.code(), RpcResponseCode::RemoteExecError);
        assert!(response.value().is_none());
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!(matches!(
            RpcResponse::from_envelope(json!([null, 99])),
            Err(EnvelopeError::UnknownResponseCode(_))
        ));
        assert!(matches!(
            RpcResponse::from_envelope(json!([null, 300])),
            Err(EnvelopeError::UnknownResponseCode(_))
        ));
    }
}
