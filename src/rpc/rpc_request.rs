use super::envelope_error::value_kind;
use super::{EnvelopeError, RpcArguments, RpcMetadata, RpcVersion};
use crate::constants::{
    REQUEST_ARGUMENTS_INDEX, REQUEST_ENVELOPE_LEN, REQUEST_METADATA_INDEX, REQUEST_VERSION_INDEX,
};
use serde_json::Value;

/// A versioned method invocation.
///
/// The method name is not part of the envelope: it is implied by the queue
/// the request was published to.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    version: RpcVersion,
    metadata: RpcMetadata,
    arguments: RpcArguments,
}

impl RpcRequest {
    pub fn new(
        version: impl Into<RpcVersion>,
        metadata: RpcMetadata,
        arguments: RpcArguments,
    ) -> Self {
        Self {
            version: version.into(),
            metadata,
            arguments,
        }
    }

    /// Builds a request with empty metadata.
    pub fn with_arguments(version: impl Into<RpcVersion>, arguments: RpcArguments) -> Self {
        Self::new(version, RpcMetadata::new(), arguments)
    }

    pub fn version(&self) -> &RpcVersion {
        &self.version
    }

    pub fn metadata(&self) -> &RpcMetadata {
        &self.metadata
    }

    pub fn arguments(&self) -> &RpcArguments {
        &self.arguments
    }

    pub fn into_parts(self) -> (RpcVersion, RpcMetadata, RpcArguments) {
        (self.version, self.metadata, self.arguments)
    }

    /// The `[version, metadata, arguments]` form handed to the serializer.
    pub fn to_envelope(&self) -> Value {
        Value::Array(vec![
            self.version.to_value(),
            Value::Object(self.metadata.clone()),
            Value::Object(self.arguments.clone()),
        ])
    }

    /// Destructures a decoded envelope.
    ///
    /// The envelope must be a sequence of exactly three elements; a shorter or
    /// longer sequence is rejected rather than truncated or padded.
    pub fn from_envelope(envelope: Value) -> Result<Self, EnvelopeError> {
        let mut elements = match envelope {
            Value::Array(elements) => elements,
            other => {
                return Err(EnvelopeError::NotASequence {
                    found: value_kind(&other),
                });
            }
        };

        if elements.len() != REQUEST_ENVELOPE_LEN {
            return Err(EnvelopeError::ElementCount {
                expected: "3",
                found: elements.len(),
            });
        }

        let version = RpcVersion::from_value(&elements[REQUEST_VERSION_INDEX]).ok_or(
            EnvelopeError::InvalidVersion {
                found: value_kind(&elements[REQUEST_VERSION_INDEX]),
            },
        )?;
        let arguments = take_map(&mut elements[REQUEST_ARGUMENTS_INDEX], "arguments")?;
        let metadata = take_map(&mut elements[REQUEST_METADATA_INDEX], "metadata")?;

        Ok(Self {
            version,
            metadata,
            arguments,
        })
    }
}

fn take_map(value: &mut Value, field: &'static str) -> Result<RpcMetadata, EnvelopeError> {
    match value.take() {
        Value::Object(map) => Ok(map),
        other => Err(EnvelopeError::NotAMap {
            field,
            found: value_kind(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_truncated_and_padded_envelopes() {
        let short = RpcRequest::from_envelope(json!([1, {}]));
        assert_eq!(
            short,
            Err(EnvelopeError::ElementCount {
                expected: "3",
                found: 2
            })
        );

        let long = RpcRequest::from_envelope(json!([1, {}, {}, "extra"]));
        assert!(matches!(long, Err(EnvelopeError::ElementCount { found: 4, .. })));
    }

    #[test]
    fn rejects_non_map_arguments() {
        let result = RpcRequest::from_envelope(json!([1, {}, [42]]));
        assert_eq!(
            result,
            Err(EnvelopeError::NotAMap {
                field: "arguments",
                found: "sequence"
            })
        );
    }
}
