//! Response annotations attached to connector results.
//!
//! Annotations travel on a separate channel from the result itself: a call
//! that fails still reports the rate-limit budget the upstream returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remaining call budget reported by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDescription {
    /// Calls allowed in the current window.
    pub limit: u64,
    /// Calls left in the current window.
    pub remaining: u64,
    /// When the window resets, if the upstream reported it.
    pub reset_at: Option<DateTime<Utc>>,
}

/// One response annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    /// Rate-limit metadata from one remote call.
    RateLimit(RateLimitDescription),
}

/// Ordered set of annotations accumulated across the remote calls of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    /// Creates an empty annotation set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records rate-limit metadata when a remote call reported any.
    pub fn with_rate_limiting(&mut self, rate_limit: Option<RateLimitDescription>) -> &mut Self {
        if let Some(rate_limit) = rate_limit {
            self.0.push(Annotation::RateLimit(rate_limit));
        }
        self
    }

    /// Appends every annotation from `other`, keeping existing entries.
    pub fn merge(&mut self, other: Annotations) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    /// Returns true when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of recorded annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates recorded annotations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    /// Iterates recorded rate-limit descriptions.
    pub fn rate_limits(&self) -> impl Iterator<Item = &RateLimitDescription> {
        self.0.iter().map(|annotation| match annotation {
            Annotation::RateLimit(rate_limit) => rate_limit,
        })
    }
}

impl From<Option<RateLimitDescription>> for Annotations {
    fn from(rate_limit: Option<RateLimitDescription>) -> Self {
        let mut annotations = Self::new();
        annotations.with_rate_limiting(rate_limit);
        annotations
    }
}

#[cfg(test)]
mod tests {
    use super::{Annotations, RateLimitDescription};

    fn rate_limit(remaining: u64) -> RateLimitDescription {
        RateLimitDescription {
            limit: 100,
            remaining,
            reset_at: None,
        }
    }

    #[test]
    fn missing_rate_limit_adds_nothing() {
        let annotations = Annotations::from(None);
        assert!(annotations.is_empty());
    }

    #[test]
    fn merge_keeps_entries_from_both_sets() {
        let mut annotations = Annotations::from(Some(rate_limit(10)));
        annotations.merge(Annotations::from(Some(rate_limit(9))));

        let remaining: Vec<u64> = annotations.rate_limits().map(|rl| rl.remaining).collect();
        assert_eq!(remaining, vec![10, 9]);
    }
}
