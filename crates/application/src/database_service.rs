//! Database listing and permission translation.

use std::sync::Arc;

use metagov_core::{AppError, AppResult};
use metagov_domain::{
    Annotations, Database, DatabaseEntitlement, DatabaseId, Entitlement, Grant, Resource,
    ResourceId, ResourceType,
};
use tracing::{debug, warn};

use crate::metabase_ports::{Annotated, CallContext, MetabaseClient, Page, PageToken, RemoteResponse};

/// Application service exposing Metabase databases and the groups granted on them.
#[derive(Clone)]
pub struct DatabaseService {
    client: Arc<dyn MetabaseClient>,
}

impl DatabaseService {
    /// Creates a new service from the Metabase client port.
    #[must_use]
    pub fn new(client: Arc<dyn MetabaseClient>) -> Self {
        Self { client }
    }

    /// Fetches databases, wrapping failures with listing context.
    pub async fn fetch_databases(&self, context: &CallContext) -> RemoteResponse<Vec<Database>> {
        let response = self.client.list_databases(context).await;
        match response.result {
            Ok(databases) => RemoteResponse::ok(databases, response.rate_limit),
            Err(error) => RemoteResponse::err(
                AppError::remote_fetch("failed to list databases", error),
                response.rate_limit,
            ),
        }
    }

    /// Translates the permission graph into grants on one database.
    ///
    /// On failure no grants are returned; the rate limit is reported either way.
    pub async fn translate_grants(
        &self,
        context: &CallContext,
        database: &Resource,
    ) -> RemoteResponse<Vec<Grant>> {
        if let Err(error) = require_database(database) {
            return RemoteResponse::err(error, None);
        }

        let database_id = DatabaseId::new(database.id().resource());
        let response = self
            .client
            .get_permission_matrix(context, &database_id)
            .await;

        match response.result {
            Ok(matrix) => {
                let grants = matrix.grants_for_database(database);
                debug!(
                    database_id = %database_id,
                    groups = matrix.group_count(),
                    grants = grants.len(),
                    "translated database permission graph"
                );
                RemoteResponse::ok(grants, response.rate_limit)
            }
            Err(error) => {
                warn!(database_id = %database_id, error = %error, "permission graph fetch failed");
                RemoteResponse::err(
                    AppError::remote_fetch("failed to list database permissions", error),
                    response.rate_limit,
                )
            }
        }
    }

    /// Lists databases as resources. Always a single page.
    pub async fn list_databases(
        &self,
        context: &CallContext,
        _page_token: &PageToken,
    ) -> Annotated<Page<Resource>> {
        let response = self.fetch_databases(context).await;
        let annotations = Annotations::from(response.rate_limit);

        let resources = response.result.and_then(|databases| {
            databases
                .into_iter()
                .map(database_resource)
                .collect::<AppResult<Vec<_>>>()
                .map_err(|error| AppError::remote_fetch("failed to list databases", error))
        });

        match resources {
            Ok(resources) => Annotated::ok(Page::single(resources), annotations),
            Err(error) => Annotated::err(error, annotations),
        }
    }

    /// Lists the entitlements a database offers. No remote call is made.
    pub async fn list_entitlements(
        &self,
        _context: &CallContext,
        database: &Resource,
        _page_token: &PageToken,
    ) -> Annotated<Page<Entitlement>> {
        if let Err(error) = require_database(database) {
            return Annotated::err(error, Annotations::new());
        }

        let entitlements = DatabaseEntitlement::all()
            .iter()
            .map(|slug| Entitlement::for_database(database, *slug))
            .collect();

        Annotated::ok(Page::single(entitlements), Annotations::new())
    }

    /// Lists grants on a database. Always a single page.
    pub async fn list_grants(
        &self,
        context: &CallContext,
        database: &Resource,
        _page_token: &PageToken,
    ) -> Annotated<Page<Grant>> {
        let response = self.translate_grants(context, database).await;
        let annotations = Annotations::from(response.rate_limit);

        match response.result {
            Ok(grants) => Annotated::ok(Page::single(grants), annotations),
            Err(error) => Annotated::err(error, annotations),
        }
    }
}

/// Unnamed databases are listed under their id.
fn database_resource(database: Database) -> AppResult<Resource> {
    let display_name = if database.name.trim().is_empty() {
        database.id.to_string()
    } else {
        database.name
    };

    Resource::new(
        ResourceId::new(ResourceType::Database, database.id.as_str()),
        display_name,
    )
}

fn require_database(resource: &Resource) -> AppResult<()> {
    if resource.id().resource_type() != ResourceType::Database {
        return Err(AppError::Validation(format!(
            "expected a database resource, got '{}'",
            resource.id()
        )));
    }

    if resource.id().resource().trim().is_empty() {
        return Err(AppError::Validation(
            "database resource id must not be empty".to_owned(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests;
