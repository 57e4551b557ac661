use std::time::Duration;

/// Number of unacknowledged deliveries a method binding may hold at once.
///
/// Mirrors AMQP's `basic.qos` prefetch count; `0` disables the bound.
pub const DEFAULT_PREFETCH_COUNT: u16 = 1;

/// How long a client waits for a correlated reply before giving up.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Prefix for the private reply queue each client declares.
pub const REPLY_QUEUE_PREFIX: &str = "coney.reply";

/// Number of top-level elements in an encoded request: version, metadata, arguments.
pub const REQUEST_ENVELOPE_LEN: usize = 3;

/// Index of each element within the request envelope.
pub const REQUEST_VERSION_INDEX: usize = 0;
pub const REQUEST_METADATA_INDEX: usize = 1;
pub const REQUEST_ARGUMENTS_INDEX: usize = 2;

/// Response envelopes carry `[value, code]` or `[value, code, details]`.
pub const RESPONSE_ENVELOPE_MIN_LEN: usize = 2;
pub const RESPONSE_ENVELOPE_MAX_LEN: usize = 3;
