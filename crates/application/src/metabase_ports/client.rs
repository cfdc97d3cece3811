use async_trait::async_trait;
use metagov_domain::{Database, DatabaseId, MetabaseUser, PermissionMatrix};

use super::{ActionOutcome, Annotated, CallContext, RemoteResponse};

/// Port for reading Metabase state.
#[async_trait]
pub trait MetabaseClient: Send + Sync {
    /// Lists every database connected to Metabase.
    async fn list_databases(&self, context: &CallContext) -> RemoteResponse<Vec<Database>>;

    /// Fetches the group permission graph.
    ///
    /// The graph may cover every database, not only `database_id`.
    async fn get_permission_matrix(
        &self,
        context: &CallContext,
        database_id: &DatabaseId,
    ) -> RemoteResponse<PermissionMatrix>;

    /// Looks up one user.
    ///
    /// Metabase only surfaces active users here, so a deactivated user comes
    /// back as [`metagov_core::AppError::NotFound`].
    async fn get_user_by_id(
        &self,
        context: &CallContext,
        user_id: &str,
    ) -> RemoteResponse<MetabaseUser>;
}

/// Port for changing whether a Metabase user can sign in.
#[async_trait]
pub trait UserStateMutator: Send + Sync {
    /// Reactivates a user.
    async fn enable_user(&self, context: &CallContext, user_id: &str) -> Annotated<ActionOutcome>;

    /// Deactivates a user.
    async fn disable_user(&self, context: &CallContext, user_id: &str)
    -> Annotated<ActionOutcome>;
}
