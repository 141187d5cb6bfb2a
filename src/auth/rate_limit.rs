//! Sliding-window rate limiting for sign-in, sign-up and password reset.
//!
//! Keys look like `"<action>:<subject>"`, e.g. `"login:alice@example.com"`.
//! The action prefix selects the [`RateLimitPolicy`]; keys without a known
//! prefix use the fallback policy.

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// Attempt accounting injected into anything that needs throttling.
pub trait RateLimiter: Send + Sync {
    /// Whether another attempt for `key` is allowed right now.
    fn can_attempt(&self, key: &str) -> bool;

    /// Record an attempt for `key`.
    fn record_attempt(&self, key: &str);

    /// Forget every attempt recorded for `key` (e.g. after a successful login).
    fn reset(&self, key: &str);

    /// How long until `key` may try again, or `None` if it may try now.
    ///
    /// A policy allowing zero attempts never opens; it reports a full window.
    fn retry_after(&self, key: &str) -> Option<Duration>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Longest window a policy may configure: one year.
pub const MAX_WINDOW_SECS: u64 = 366 * 24 * 60 * 60;

/// At most `max_attempts` within any `window_secs`-long window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RateLimitPolicy {
    pub max_attempts: u32,
    pub window_secs: u64,
}

impl RateLimitPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, window_secs: u64) -> Self {
        Self {
            max_attempts,
            window_secs,
        }
    }

    /// Five sign-in attempts per fifteen minutes.
    #[must_use]
    pub const fn login() -> Self {
        Self::new(5, 15 * 60)
    }

    /// Three sign-ups per hour.
    #[must_use]
    pub const fn signup() -> Self {
        Self::new(3, 60 * 60)
    }

    /// Three password-reset emails per hour.
    #[must_use]
    pub const fn password_reset() -> Self {
        Self::new(3, 60 * 60)
    }

    /// Window length, saturating at the largest representable duration.
    fn window(&self) -> Duration {
        i64::try_from(self.window_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::login()
    }
}

/// Per-action policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RateLimitConfig {
    pub login: RateLimitPolicy,
    pub signup: RateLimitPolicy,
    pub password_reset: RateLimitPolicy,
    /// Used for keys whose action prefix is not listed above
    pub fallback: RateLimitPolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login: RateLimitPolicy::login(),
            signup: RateLimitPolicy::signup(),
            password_reset: RateLimitPolicy::password_reset(),
            fallback: RateLimitPolicy::default(),
        }
    }
}

impl RateLimitConfig {
    /// Policy for a key, chosen by its action prefix.
    #[must_use]
    pub fn policy_for(&self, key: &str) -> RateLimitPolicy {
        let action = key.split_once(':').map_or(key, |(action, _)| action);
        match action {
            "login" => self.login,
            "signup" => self.signup,
            "password_reset" => self.password_reset,
            _ => self.fallback,
        }
    }
}

/// Process-local [`RateLimiter`] keeping attempt timestamps in memory.
#[derive(Debug)]
pub struct InMemoryRateLimiter<C: Clock = SystemClock> {
    config: RateLimitConfig,
    clock: C,
    attempts: RwLock<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl InMemoryRateLimiter<SystemClock> {
    /// Create a limiter on wall-clock time.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> InMemoryRateLimiter<C> {
    /// Create a limiter on a custom clock.
    #[must_use]
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            attempts: RwLock::new(HashMap::new()),
        }
    }

    /// The clock driving this limiter.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Earliest instant still inside `key`'s window ending at `now`.
    fn window_start(&self, key: &str, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.config.policy_for(key).window())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Attempts for `key` still inside the window, oldest first.
    fn recent(&self, key: &str) -> Vec<DateTime<Utc>> {
        let window_start = self.window_start(key, self.clock.now());
        let attempts = self
            .attempts
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        attempts
            .get(key)
            .map(|times| times.iter().copied().filter(|t| *t > window_start).collect())
            .unwrap_or_default()
    }
}

impl<C: Clock> RateLimiter for InMemoryRateLimiter<C> {
    fn can_attempt(&self, key: &str) -> bool {
        let policy = self.config.policy_for(key);
        self.recent(key).len() < policy.max_attempts as usize
    }

    fn record_attempt(&self, key: &str) {
        let now = self.clock.now();
        let mut attempts = self
            .attempts
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        attempts.entry(key.to_string()).or_default().push(now);

        // Drop expired timestamps for every key, and keys left with none.
        attempts.retain(|tracked, times| {
            let window_start = self.window_start(tracked, now);
            times.retain(|t| *t > window_start);
            !times.is_empty()
        });
        let recent = attempts.get(key).map_or(0, Vec::len);
        tracing::debug!(key, recent, tracked = attempts.len(), "attempt recorded");
    }

    fn reset(&self, key: &str) {
        self.attempts
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }

    fn retry_after(&self, key: &str) -> Option<Duration> {
        let policy = self.config.policy_for(key);
        if policy.max_attempts == 0 {
            return Some(policy.window());
        }
        let recent = self.recent(key);
        let max_attempts = policy.max_attempts as usize;
        if recent.len() < max_attempts {
            return None;
        }

        // The window reopens when the attempt that filled it ages out.
        let blocking = recent[recent.len() - max_attempts];
        let remaining = blocking
            .checked_add_signed(policy.window())
            .map_or(Duration::MAX, |reopens| reopens - self.clock.now());
        Some(remaining.max(Duration::zero()))
    }
}
