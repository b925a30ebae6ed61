// Request pacing for the hosted inference API.
//
// The free Hugging Face tier throttles bursty clients. Callers reserve the
// next free slot under a short lock and sleep outside it, so concurrent
// callers queue up one interval apart.

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Pace requests to at most `per_second` per second.
    pub fn new(per_second: f64) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / per_second),
            next_slot: Mutex::new(None),
        }
    }

    /// Wait for this caller's slot.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next.map_or(now, |at| at.max(now));
            *next = Some(slot + self.interval);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_slot_is_immediate() {
        let limiter = RateLimiter::new(1.0);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_back_to_back_calls_are_spaced() {
        let limiter = RateLimiter::new(4.0);
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        // Slots at 0, 250 and 500 ms
        assert!(start.elapsed() >= Duration::from_millis(450));
    }

    #[tokio::test]
    async fn test_idle_time_is_not_banked() {
        let limiter = RateLimiter::new(10.0);
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        // Long past the reserved slot: no wait, but the next one is spaced again
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
