//! Global fetch budget shared by every agent in a run.
//!
//! A token bucket with lazy refill: nothing ticks in the background, the bucket
//! is topped up from elapsed time whenever someone asks for a token. Because all
//! agents share one instance, the rate is a combined ceiling, not per agent.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Cancelled, CoreError, Result};

#[derive(Debug)]
struct Bucket {
    tokens: u32,
    /// Refill clock. Advances only by the time that minted whole tokens, so a
    /// partial refill interval is carried over to the next acquisition.
    last: Instant,
}

/// Shared token bucket. `capacity` tokens per `interval`, burst up to `capacity`.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    interval: Duration,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Create a full bucket. Fails for a zero rate or zero interval, for which
    /// no wait time is defined.
    pub fn new(rate: u32, interval: Duration) -> Result<Self> {
        if rate == 0 || interval.is_zero() {
            return Err(CoreError::InvalidRate);
        }
        Ok(Self {
            capacity: rate,
            interval,
            bucket: Mutex::new(Bucket {
                tokens: rate,
                last: Instant::now(),
            }),
        })
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time for one token to be minted.
    fn token_period(&self) -> Duration {
        self.interval / self.capacity
    }

    fn refill(&self, bucket: &mut Bucket, now: Instant) {
        if bucket.tokens >= self.capacity {
            bucket.last = now;
            return;
        }
        let elapsed = now.saturating_duration_since(bucket.last);
        let minted = (elapsed.as_secs_f64() / self.interval.as_secs_f64()
            * f64::from(self.capacity))
        .floor();
        if minted < 1.0 {
            return;
        }
        let room = self.capacity - bucket.tokens;
        if minted >= f64::from(room) {
            bucket.tokens = self.capacity;
            bucket.last = now;
        } else {
            let minted = minted as u32;
            bucket.tokens += minted;
            bucket.last += self.token_period() * minted;
        }
    }

    /// Take a token if one is available right now.
    pub fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        self.refill(&mut bucket, Instant::now());
        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens currently available (after refill). Informational only; another
    /// caller may take them before you do.
    pub fn available(&self) -> u32 {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        self.refill(&mut bucket, Instant::now());
        bucket.tokens
    }

    /// Wait for a token, or until `cancel` fires.
    ///
    /// While empty the caller sleeps for one token period (`interval / capacity`)
    /// and retries. The lock is never held across the sleep. A cancelled wait
    /// consumes nothing.
    pub async fn acquire(&self, cancel: &CancellationToken) -> std::result::Result<(), Cancelled> {
        loop {
            if cancel.is_cancelled() {
                return Err(Cancelled);
            }
            if self.try_acquire() {
                return Ok(());
            }
            tokio::select! {
                _ = cancel.cancelled() => return Err(Cancelled),
                _ = tokio::time::sleep(self.token_period()) => {}
            }
        }
    }
}
