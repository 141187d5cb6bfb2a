//! Password-recovery session state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a recovery link stays usable once the flow has started.
pub const DEFAULT_RECOVERY_TTL_SECS: i64 = 60 * 60;

/// Whether the user is part-way through a password recovery.
///
/// Callers own this value and pass it where it is needed; nothing reads it
/// from ambient storage. Transitions consume `self` and return the new state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthRecoveryState {
    #[default]
    Inactive,
    Recovering {
        email: String,
        started_at: DateTime<Utc>,
    },
}

impl AuthRecoveryState {
    /// Start recovery for `email` at `now`, replacing any earlier attempt.
    #[must_use]
    pub fn begin(self, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        let email = email.into();
        tracing::debug!(email = %email, "password recovery started");
        Self::Recovering {
            email,
            started_at: now,
        }
    }

    /// Whether a recovery is in progress (expired or not).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Recovering { .. })
    }

    /// Whether an in-progress recovery is older than `ttl` at `now`.
    ///
    /// An inactive state is never expired.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match self {
            Self::Inactive => false,
            Self::Recovering { started_at, .. } => now - *started_at > ttl,
        }
    }

    /// The address the recovery was started for.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Inactive => None,
            Self::Recovering { email, .. } => Some(email),
        }
    }

    /// Finish the flow after the new password has been set.
    #[must_use]
    pub fn complete(self) -> Self {
        if let Self::Recovering { email, .. } = &self {
            tracing::debug!(email = %email, "password recovery completed");
        }
        Self::Inactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let state = AuthRecoveryState::default();
        assert!(!state.is_active());
        assert_eq!(state.email(), None);

        let state = state.begin("alice@example.com", noon());
        assert!(state.is_active());
        assert_eq!(state.email(), Some("alice@example.com"));

        let state = state.complete();
        assert_eq!(state, AuthRecoveryState::Inactive);
    }

    #[test]
    fn test_expiry() {
        let ttl = Duration::seconds(DEFAULT_RECOVERY_TTL_SECS);
        let state = AuthRecoveryState::Inactive.begin("bob@example.com", noon());

        assert!(!state.is_expired(noon() + Duration::minutes(59), ttl));
        assert!(!state.is_expired(noon() + ttl, ttl));
        assert!(state.is_expired(noon() + Duration::minutes(61), ttl));
        assert!(!AuthRecoveryState::Inactive.is_expired(noon(), ttl));
    }

    #[test]
    fn test_serde_tagging() {
        let state = AuthRecoveryState::Inactive.begin("carol@example.com", noon());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "recovering");
        assert_eq!(json["email"], "carol@example.com");

        let back: AuthRecoveryState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
