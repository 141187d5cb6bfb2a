//! Trait definitions for things that can be matched by name.

use serde::{Deserialize, Serialize};

/// Anything with a display name the matcher can score against.
pub trait Named {
    /// The display name used for similarity scoring.
    fn name(&self) -> &str;
}

impl Named for str {
    fn name(&self) -> &str {
        self
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

impl<T: Named + ?Sized> Named for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A brand or product record owned by the backend.
///
/// Immutable once created; the matcher only ever reads lists of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: String,
    pub name: String,
}

impl NamedEntity {
    /// Create a new entity
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Named for NamedEntity {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A candidate that scored at or above the matcher's threshold.
#[derive(Debug)]
#[must_use]
pub struct NameMatch<'a, T: ?Sized> {
    /// The matched candidate
    pub candidate: &'a T,
    /// Similarity score (0.0 - 1.0)
    pub score: f64,
}

// Copy for any T: only a reference is held.
impl<T: ?Sized> Clone for NameMatch<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for NameMatch<'_, T> {}

impl<'a, T: Named + ?Sized> NameMatch<'a, T> {
    /// Whether the candidate's name equals the input ignoring case and spacing.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.score >= 1.0
    }

    /// Display name of the matched candidate.
    #[must_use]
    pub fn name(&self) -> &'a str {
        <T as Named>::name(self.candidate)
    }
}
