// ── Upstream politeness ──
//
// Request spacing and retry backoff for the geocoder, which publishes a
// hard per-client request rate.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

const MAX_BACKOFF_SHIFT: u32 = 10;

/// Longest wait a `Retry-After` header can impose on one retry.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Enforces a minimum interval between consecutive permits.
///
/// Callers queue on the internal lock, so concurrent lookups leave the
/// process one at a time no matter how many tasks are in flight.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait until the next request may be sent.
    pub async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let mut next_slot = self.next_slot.lock().await;
        if let Some(at) = *next_slot {
            if at > Instant::now() {
                sleep_until(at).await;
            }
        }
        *next_slot = Some(Instant::now() + self.min_interval);
    }
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt - 1)`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT);
    base.saturating_mul(1 << shift)
}

/// Delay before retry number `attempt` when the upstream may have sent a
/// `Retry-After` hint. The hint can lengthen the wait but never past
/// [`MAX_RETRY_AFTER`].
pub fn retry_delay(base: Duration, attempt: u32, retry_after: Option<Duration>) -> Duration {
    let delay = backoff_delay(base, attempt);
    match retry_after {
        Some(hint) => delay.max(hint.min(MAX_RETRY_AFTER)),
        None => delay,
    }
}
