use metagov_core::{AppError, AppResult};
use metagov_domain::{Annotations, RateLimitDescription};
use serde::{Deserialize, Serialize};

/// Outcome of one remote call together with the rate limit it reported.
///
/// The rate limit is independent of the result and may accompany an error.
#[derive(Debug)]
pub struct RemoteResponse<T> {
    /// Call result.
    pub result: AppResult<T>,
    /// Rate-limit metadata returned by the upstream, if any.
    pub rate_limit: Option<RateLimitDescription>,
}

impl<T> RemoteResponse<T> {
    /// Creates a successful response.
    #[must_use]
    pub fn ok(value: T, rate_limit: Option<RateLimitDescription>) -> Self {
        Self {
            result: Ok(value),
            rate_limit,
        }
    }

    /// Creates a failed response.
    #[must_use]
    pub fn err(error: AppError, rate_limit: Option<RateLimitDescription>) -> Self {
        Self {
            result: Err(error),
            rate_limit,
        }
    }
}

/// Result returned to the host together with accumulated annotations.
#[derive(Debug)]
pub struct Annotated<T> {
    /// Operation result.
    pub result: AppResult<T>,
    /// Annotations collected from every remote call of the operation.
    pub annotations: Annotations,
}

impl<T> Annotated<T> {
    /// Creates a successful annotated result.
    #[must_use]
    pub fn ok(value: T, annotations: Annotations) -> Self {
        Self {
            result: Ok(value),
            annotations,
        }
    }

    /// Creates a failed annotated result.
    #[must_use]
    pub fn err(error: AppError, annotations: Annotations) -> Self {
        Self {
            result: Err(error),
            annotations,
        }
    }
}

/// Opaque continuation token for listing operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    /// Returns true for the end-of-listing token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Token for the next page; empty when the listing is complete.
    pub next_page_token: PageToken,
}

impl<T> Page<T> {
    /// Creates the only page of a listing.
    #[must_use]
    pub fn single(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: PageToken::default(),
        }
    }
}

/// Structured result of a user lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Whether the target state was reached.
    pub success: bool,
}

impl ActionOutcome {
    /// Returns the outcome of an action that reached its target state.
    #[must_use]
    pub fn succeeded() -> Self {
        Self { success: true }
    }
}
