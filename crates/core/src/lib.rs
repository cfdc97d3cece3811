//! Shared primitives for all Rust crates in Metagov.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Metagov crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant, rejected before any remote call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested remote object does not exist or is not visible.
    #[error("not found: {0}")]
    NotFound(String),

    /// Upstream or transport failure, carrying the upstream message verbatim.
    #[error("{0}")]
    Remote(String),

    /// The call context was cancelled or its deadline elapsed.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// A read against the remote system failed.
    #[error("{context}: {source}")]
    RemoteFetch {
        /// Operation-specific prefix naming the failing step.
        context: String,
        /// Underlying failure.
        source: Box<AppError>,
    },

    /// A state-changing call against the remote system failed.
    #[error("{context}: {source}")]
    RemoteMutation {
        /// Operation-specific prefix naming the failing step.
        context: String,
        /// Underlying failure.
        source: Box<AppError>,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps a failed read with a human-readable context prefix.
    #[must_use]
    pub fn remote_fetch(context: impl Into<String>, source: AppError) -> Self {
        Self::RemoteFetch {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Wraps a failed mutation with a human-readable context prefix.
    #[must_use]
    pub fn remote_mutation(context: impl Into<String>, source: AppError) -> Self {
        Self::RemoteMutation {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Returns true when this error is a plain not-found signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true when this error, or any wrapped cause, is a cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled(_) => true,
            Self::RemoteFetch { source, .. } | Self::RemoteMutation { source, .. } => {
                source.is_cancelled()
            }
            _ => false,
        }
    }
}
