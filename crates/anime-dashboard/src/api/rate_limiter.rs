//! Sliding-window rate limiter.
//!
//! Enforces both per-second and per-minute request quotas. Calls are never
//! rejected, only delayed until both trailing windows have room.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::{sleep, Instant};

const SECOND: Duration = Duration::from_secs(1);
const MINUTE: Duration = Duration::from_secs(60);

/// Rate limiter with dual constraints (per-second and per-minute)
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum requests in any trailing second
    max_per_second: usize,
    /// Maximum requests in any trailing minute
    max_per_minute: usize,
    /// Timestamps of accepted requests in the last minute, oldest first
    recent_requests: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// A quota of zero is treated as one so that `acquire` always completes.
    pub fn new(max_per_second: u32, max_per_minute: u32) -> Self {
        let max_per_minute = max_per_minute.max(1) as usize;
        Self {
            max_per_second: max_per_second.max(1) as usize,
            max_per_minute,
            recent_requests: VecDeque::with_capacity(max_per_minute),
        }
    }

    /// Wait until a request can be made, respecting both rate limits
    pub async fn acquire(&mut self) {
        let accepted_at = loop {
            let now = Instant::now();
            match self.required_wait(now) {
                None => break now,
                Some((wait, window)) => {
                    tracing::debug!(
                        wait_ms = wait.as_millis() as u64,
                        window = window,
                        "Rate limit: waiting for window to roll over"
                    );
                    sleep(wait).await;
                }
            }
        };

        self.recent_requests.push_back(accepted_at);
    }

    /// Time to wait before a request at `now` fits both windows, together
    /// with the name of the window that imposes the longest wait.
    fn required_wait(&mut self, now: Instant) -> Option<(Duration, &'static str)> {
        self.prune(now);

        let len = self.recent_requests.len();
        let mut longest: Option<(Duration, &'static str)> = None;

        if len >= self.max_per_minute {
            // The request that must expire to free one slot
            let blocking = self.recent_requests[len - self.max_per_minute];
            let wait = (blocking + MINUTE).saturating_duration_since(now);
            longest = Some((wait, "minute"));
        }

        if self.count_within(now, SECOND) >= self.max_per_second {
            let blocking = self.recent_requests[len - self.max_per_second];
            let wait = (blocking + SECOND).saturating_duration_since(now);
            if longest.map_or(true, |(w, _)| wait > w) {
                longest = Some((wait, "second"));
            }
        }

        longest.filter(|(wait, _)| !wait.is_zero())
    }

    /// Drop timestamps that fell out of the minute window
    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.recent_requests.front() {
            if now.saturating_duration_since(oldest) >= MINUTE {
                self.recent_requests.pop_front();
            } else {
                break;
            }
        }
    }

    fn count_within(&self, now: Instant, window: Duration) -> usize {
        self.recent_requests
            .iter()
            .rev()
            .take_while(|&&t| now.saturating_duration_since(t) < window)
            .count()
    }

    /// Get the current number of requests in the last minute
    pub fn current_minute_count(&mut self) -> usize {
        let now = Instant::now();
        self.prune(now);
        self.recent_requests.len()
    }

    /// Get the current number of requests in the last second
    pub fn current_second_count(&mut self) -> usize {
        let now = Instant::now();
        self.prune(now);
        self.count_within(now, SECOND)
    }

    /// Configured per-second quota
    pub fn max_per_second(&self) -> usize {
        self.max_per_second
    }

    /// Configured per-minute quota
    pub fn max_per_minute(&self) -> usize {
        self.max_per_minute
    }
}
