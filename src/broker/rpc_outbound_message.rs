use bytes::Bytes;

/// A payload on its way to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcOutboundMessage {
    routing_key: String,
    correlation_id: Option<String>,
    reply_to: Option<String>,
    payload: Bytes,
}

impl RpcOutboundMessage {
    /// A request for the method bound to `routing_key`, expecting its reply on `reply_to`.
    pub fn request(
        routing_key: impl Into<String>,
        correlation_id: impl Into<String>,
        reply_to: impl Into<String>,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            routing_key: routing_key.into(),
            correlation_id: Some(correlation_id.into()),
            reply_to: Some(reply_to.into()),
            payload: payload.into(),
        }
    }

    /// A reply routed to a caller's reply address, tagged with the request's token.
    pub fn reply(
        reply_to: impl Into<String>,
        correlation_id: Option<String>,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            routing_key: reply_to.into(),
            correlation_id,
            reply_to: None,
            payload: payload.into(),
        }
    }

    pub fn routing_key(&self) -> &str {
        &self.routing_key
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn reply_to(&self) -> Option<&str> {
        self.reply_to.as_deref()
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}
