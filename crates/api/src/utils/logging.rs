use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

/// Log the outcome of one pipeline request with structured fields.
///
/// Only sizes and counts are logged, never the text or the entities found
/// in it.
#[inline]
pub fn log_request_execution(
    endpoint: &str,
    request_id: Uuid,
    text_len: usize,
    entity_count: Option<usize>,
    elapsed: Duration,
) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match entity_count {
        Some(entity_count) => info!(
            endpoint,
            request_id = %request_id,
            text_len,
            entity_count,
            duration_ms,
            "request_completed"
        ),
        None => warn!(endpoint, request_id = %request_id, text_len, duration_ms, "request_failed"),
    }
}
