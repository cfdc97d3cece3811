//! Idempotent enable/disable actions reconciled against Metabase state.
//!
//! Metabase's user lookup hides deactivated accounts behind a 404, so a
//! not-found lookup is read as "inactive" rather than "missing". Each action
//! issues at most one lookup and one mutation, and skips the mutation when the
//! observed state already matches the target.

mod state;

use std::sync::Arc;

use metagov_core::{AppError, AppResult, NonEmptyString};
use metagov_domain::Annotations;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::metabase_ports::{
    ActionOutcome, Annotated, CallContext, MetabaseClient, UserStateMutator,
};

pub use state::{ObservedUserState, TargetUserState};

/// Validated arguments of the user lifecycle actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActionArgs {
    /// Remote identifier of the user.
    pub user_id: NonEmptyString,
}

impl UserActionArgs {
    /// Creates arguments for one user.
    pub fn new(user_id: impl Into<String>) -> AppResult<Self> {
        let user_id = NonEmptyString::new(user_id).map_err(|_| {
            AppError::Validation("userId cannot be empty or whitespace".to_owned())
        })?;

        Ok(Self { user_id })
    }

    /// Parses the `{ "userId": string }` argument object.
    pub fn from_value(args: &Value) -> AppResult<Self> {
        let args = args.as_object().ok_or_else(|| {
            AppError::Validation("action arguments must be an object".to_owned())
        })?;

        let user_id = match args.get("userId") {
            None | Some(Value::Null) => {
                return Err(AppError::Validation(
                    "userId field is required".to_owned(),
                ));
            }
            Some(value) => value.as_str().ok_or_else(|| {
                AppError::Validation("userId must be a string".to_owned())
            })?,
        };

        Self::new(user_id)
    }
}

/// Application service reconciling user sign-in state.
#[derive(Clone)]
pub struct UserLifecycleService {
    client: Arc<dyn MetabaseClient>,
    mutator: Arc<dyn UserStateMutator>,
}

impl UserLifecycleService {
    /// Creates a new service from the lookup and mutation ports.
    #[must_use]
    pub fn new(client: Arc<dyn MetabaseClient>, mutator: Arc<dyn UserStateMutator>) -> Self {
        Self { client, mutator }
    }

    /// Ensures the user can sign in.
    pub async fn enable_user(
        &self,
        context: &CallContext,
        args: &UserActionArgs,
    ) -> Annotated<ActionOutcome> {
        self.reconcile(context, args, TargetUserState::Enabled).await
    }

    /// Ensures the user cannot sign in.
    pub async fn disable_user(
        &self,
        context: &CallContext,
        args: &UserActionArgs,
    ) -> Annotated<ActionOutcome> {
        self.reconcile(context, args, TargetUserState::Disabled).await
    }

    /// Observes the user's state and issues the mutation needed to reach `target`, if any.
    pub async fn reconcile(
        &self,
        context: &CallContext,
        args: &UserActionArgs,
        target: TargetUserState,
    ) -> Annotated<ActionOutcome> {
        let user_id = args.user_id.as_str();
        let mut annotations = Annotations::new();

        let lookup = self.client.get_user_by_id(context, user_id).await;
        annotations.with_rate_limiting(lookup.rate_limit);
        let observed = ObservedUserState::from_lookup(lookup.result);

        let needs_mutation = match (observed, target) {
            (ObservedUserState::Unknown(error), _) => {
                warn!(user_id, action = target.verb(), error = %error, "user lookup failed");
                return Annotated::err(
                    AppError::remote_fetch(format!("failed to fetch user {user_id}"), error),
                    annotations,
                );
            }
            // Any record the lookup returns is treated as enabled.
            (state, TargetUserState::Enabled) => !state.was_found(),
            (ObservedUserState::Active(_), TargetUserState::Disabled) => true,
            (ObservedUserState::Inactive(_), TargetUserState::Disabled) => false,
        };

        if !needs_mutation {
            debug!(
                user_id,
                action = target.verb(),
                "user already in target state, skipping"
            );
            return Annotated::ok(ActionOutcome::succeeded(), annotations);
        }

        self.mutate(context, user_id, target, annotations).await
    }

    async fn mutate(
        &self,
        context: &CallContext,
        user_id: &str,
        target: TargetUserState,
        mut annotations: Annotations,
    ) -> Annotated<ActionOutcome> {
        let failure_context = format!("failed to {} user {user_id}", target.verb());

        if let Err(error) = context.ensure_active(&failure_context) {
            return Annotated::err(
                AppError::remote_mutation(failure_context, error),
                annotations,
            );
        }

        info!(user_id, action = target.verb(), "updating user state");
        let response = match target {
            TargetUserState::Enabled => self.mutator.enable_user(context, user_id).await,
            TargetUserState::Disabled => self.mutator.disable_user(context, user_id).await,
        };
        annotations.merge(response.annotations);

        match response.result {
            Ok(outcome) => Annotated::ok(outcome, annotations),
            Err(error) => {
                warn!(user_id, action = target.verb(), error = %error, "user state update failed");
                Annotated::err(
                    AppError::remote_mutation(failure_context, error),
                    annotations,
                )
            }
        }
    }
}
