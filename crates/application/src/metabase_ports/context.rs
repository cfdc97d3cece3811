use std::future::Future;
use std::time::Duration;

use metagov_core::{AppError, AppResult};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Caller-supplied cancellation and deadline, passed into every remote call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Creates a context that is never cancelled and has no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context bound to an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            deadline: None,
        }
    }

    /// Returns a copy of this context with an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns a copy of this context expiring `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Returns true once the token fired or the deadline passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fails with [`AppError::Cancelled`] when the context is no longer live.
    pub fn ensure_active(&self, operation: &str) -> AppResult<()> {
        if self.is_cancelled() {
            return Err(AppError::Cancelled(format!(
                "{operation} aborted by call context"
            )));
        }

        Ok(())
    }

    /// Runs `future` until it completes, the token fires, or the deadline passes.
    pub async fn run<T, F>(&self, operation: &str, future: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        self.ensure_active(operation)?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(AppError::Cancelled(format!(
                "{operation} cancelled by caller"
            ))),
            () = deadline => Err(AppError::Cancelled(format!(
                "{operation} exceeded call deadline"
            ))),
            result = future => result,
        }
    }
}
