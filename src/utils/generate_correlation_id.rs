use chrono::Utc;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

/// A process-wide counter which is initialized at 0.
static GLOBAL_CORRELATION_COUNTER: Lazy<AtomicU64> = Lazy::new(|| AtomicU64::new(0));

/// Returns a fresh correlation token.
///
/// The token joins the current UTC time in microseconds with a process-wide
/// counter, so two tokens minted within the same microsecond still differ.
/// Tokens are opaque to the broker and to the server; only the client that
/// minted one ever interprets it.
///
/// # Example
/// ```rust
/// use coney::utils::generate_correlation_id;
/// let a = generate_correlation_id();
/// let b = generate_correlation_id();
/// assert_ne!(a, b);
/// ```
pub fn generate_correlation_id() -> String {
    let seq = GLOBAL_CORRELATION_COUNTER.fetch_add(1, Ordering::Relaxed);
    let micros = Utc::now().timestamp_micros();

    format!("{micros:x}-{seq:x}")
}

/// Returns a unique queue name under `prefix`, used for private reply queues.
pub fn generate_queue_name(prefix: &str) -> String {
    format!("{prefix}.{}", generate_correlation_id())
}
