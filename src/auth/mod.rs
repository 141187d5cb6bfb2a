//! Authentication helpers.
//!
//! Throttling and recovery state are plain values handed to whoever needs
//! them. A [`RateLimiter`] is injected (usually an [`InMemoryRateLimiter`]);
//! [`AuthRecoveryState`] is passed around by value.

mod rate_limit;
mod recovery;

pub use rate_limit::{
    Clock, InMemoryRateLimiter, ManualClock, RateLimitConfig, RateLimitPolicy, RateLimiter,
    SystemClock, MAX_WINDOW_SECS,
};
pub use recovery::{AuthRecoveryState, DEFAULT_RECOVERY_TTL_SECS};
