//! Registry of custom connector actions.

mod schema;

use std::str::FromStr;

use metagov_core::{AppError, AppResult};
use metagov_domain::Annotations;
use serde_json::Value;

use crate::metabase_ports::{Annotated, CallContext};
use crate::user_lifecycle_service::{UserActionArgs, UserLifecycleService};

pub use schema::{ActionField, ActionFieldType, ActionSchema};

/// Custom actions the connector exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Reactivate a Metabase user.
    EnableUser,
    /// Deactivate a Metabase user.
    DisableUser,
}

impl UserAction {
    /// Returns the stable action name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnableUser => "enable_user",
            Self::DisableUser => "disable_user",
        }
    }

    /// Returns all registered actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[UserAction] = &[UserAction::EnableUser, UserAction::DisableUser];

        ALL
    }
}

impl FromStr for UserAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "enable_user" => Ok(Self::EnableUser),
            "disable_user" => Ok(Self::DisableUser),
            _ => Err(AppError::Validation(format!("unknown action '{value}'"))),
        }
    }
}

/// Dispatches named actions with loosely-typed arguments to the lifecycle service.
#[derive(Clone)]
pub struct ActionManager {
    user_lifecycle_service: UserLifecycleService,
    schemas: Vec<ActionSchema>,
}

impl ActionManager {
    /// Creates a manager with the enable/disable actions registered.
    #[must_use]
    pub fn new(user_lifecycle_service: UserLifecycleService) -> Self {
        Self {
            user_lifecycle_service,
            schemas: UserAction::all()
                .iter()
                .map(|action| ActionSchema::for_action(*action))
                .collect(),
        }
    }

    /// Returns the schemas of every registered action.
    #[must_use]
    pub fn list_actions(&self) -> &[ActionSchema] {
        &self.schemas
    }

    /// Validates the action name and arguments, then runs the action.
    ///
    /// Validation failures are returned before any remote call is made.
    pub async fn invoke(
        &self,
        context: &CallContext,
        action_name: &str,
        args: &Value,
    ) -> Annotated<Value> {
        let parsed = UserAction::from_str(action_name)
            .and_then(|action| UserActionArgs::from_value(args).map(|args| (action, args)));
        let (action, args) = match parsed {
            Ok(parsed) => parsed,
            Err(error) => return Annotated::err(error, Annotations::new()),
        };

        let response = match action {
            UserAction::EnableUser => {
                self.user_lifecycle_service
                    .enable_user(context, &args)
                    .await
            }
            UserAction::DisableUser => {
                self.user_lifecycle_service
                    .disable_user(context, &args)
                    .await
            }
        };

        Annotated {
            result: response.result.and_then(to_value),
            annotations: response.annotations,
        }
    }
}

fn to_value<T: serde::Serialize>(value: T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|error| AppError::Internal(format!("failed to encode action result: {error}")))
}
