use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use metagov_core::AppError;
use metagov_domain::{
    Database, DatabaseEntitlement, DatabaseId, GroupPermission, MetabaseUser, PermissionMatrix,
    RateLimitDescription, Resource, ResourceId, ResourceType,
};
use tokio::sync::Mutex;

use crate::metabase_ports::{CallContext, MetabaseClient, PageToken, RemoteResponse};

use super::DatabaseService;

struct FakeMetabaseClient {
    databases: Result<Vec<Database>, String>,
    matrix: Result<PermissionMatrix, String>,
    rate_limit: Option<RateLimitDescription>,
    requested_matrices: Mutex<Vec<DatabaseId>>,
}

impl FakeMetabaseClient {
    fn new() -> Self {
        Self {
            databases: Ok(Vec::new()),
            matrix: Ok(PermissionMatrix::default()),
            rate_limit: None,
            requested_matrices: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MetabaseClient for FakeMetabaseClient {
    async fn list_databases(&self, _context: &CallContext) -> RemoteResponse<Vec<Database>> {
        match &self.databases {
            Ok(databases) => RemoteResponse::ok(databases.clone(), self.rate_limit.clone()),
            Err(message) => {
                RemoteResponse::err(AppError::Remote(message.clone()), self.rate_limit.clone())
            }
        }
    }

    async fn get_permission_matrix(
        &self,
        _context: &CallContext,
        database_id: &DatabaseId,
    ) -> RemoteResponse<PermissionMatrix> {
        self.requested_matrices
            .lock()
            .await
            .push(database_id.clone());

        match &self.matrix {
            Ok(matrix) => RemoteResponse::ok(matrix.clone(), self.rate_limit.clone()),
            Err(message) => {
                RemoteResponse::err(AppError::Remote(message.clone()), self.rate_limit.clone())
            }
        }
    }

    async fn get_user_by_id(
        &self,
        _context: &CallContext,
        user_id: &str,
    ) -> RemoteResponse<MetabaseUser> {
        RemoteResponse::err(AppError::NotFound(format!("user {user_id}")), None)
    }
}

fn rate_limit(limit: u64, remaining: u64) -> RateLimitDescription {
    RateLimitDescription {
        limit,
        remaining,
        reset_at: None,
    }
}

fn sales_database() -> Resource {
    match Resource::new(ResourceId::new(ResourceType::Database, "1"), "SalesDB") {
        Ok(resource) => resource,
        Err(error) => panic!("database resource should be valid: {error}"),
    }
}

fn service(client: FakeMetabaseClient) -> (DatabaseService, Arc<FakeMetabaseClient>) {
    let client = Arc::new(client);
    (DatabaseService::new(client.clone()), client)
}

#[tokio::test]
async fn list_databases_returns_resources_with_rate_limit() {
    let (service, _) = service(FakeMetabaseClient {
        databases: Ok(vec![Database {
            id: DatabaseId::from(1),
            name: "SalesDB".to_owned(),
        }]),
        rate_limit: Some(rate_limit(100, 10)),
        ..FakeMetabaseClient::new()
    });

    let listing = service
        .list_databases(&CallContext::new(), &PageToken::default())
        .await;

    let Ok(page) = listing.result else {
        panic!("listing should succeed");
    };
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].display_name(), "SalesDB");
    assert_eq!(page.items[0].id().resource(), "1");
    assert!(page.next_page_token.is_empty());
    assert!(!listing.annotations.is_empty());
}

#[tokio::test]
async fn list_databases_names_unnamed_databases_after_their_id() {
    let (service, _) = service(FakeMetabaseClient {
        databases: Ok(vec![
            Database {
                id: DatabaseId::from(1),
                name: "SalesDB".to_owned(),
            },
            Database {
                id: DatabaseId::from(2),
                name: String::new(),
            },
            Database {
                id: DatabaseId::new("3"),
                name: "  ".to_owned(),
            },
        ]),
        ..FakeMetabaseClient::new()
    });

    let listing = service
        .list_databases(&CallContext::new(), &PageToken::default())
        .await;

    let Ok(page) = listing.result else {
        panic!("listing with unnamed databases should succeed");
    };
    let names: Vec<(&str, &str)> = page
        .items
        .iter()
        .map(|resource| (resource.id().resource(), resource.display_name()))
        .collect();
    assert_eq!(names, vec![("1", "SalesDB"), ("2", "2"), ("3", "3")]);
}

#[tokio::test]
async fn list_databases_wraps_unusable_database_record() {
    let (service, _) = service(FakeMetabaseClient {
        databases: Ok(vec![Database {
            id: DatabaseId::new(""),
            name: String::new(),
        }]),
        ..FakeMetabaseClient::new()
    });

    let listing = service
        .list_databases(&CallContext::new(), &PageToken::default())
        .await;

    let Err(error) = listing.result else {
        panic!("listing should fail");
    };
    assert!(matches!(error, AppError::RemoteFetch { .. }));
    assert!(error.to_string().starts_with("failed to list databases: "));
}

#[tokio::test]
async fn list_databases_with_no_databases_is_empty_and_unannotated() {
    let (service, _) = service(FakeMetabaseClient::new());

    let listing = service
        .list_databases(&CallContext::new(), &PageToken::default())
        .await;

    let Ok(page) = listing.result else {
        panic!("listing should succeed");
    };
    assert!(page.items.is_empty());
    assert!(page.next_page_token.is_empty());
    assert!(listing.annotations.is_empty());
}

#[tokio::test]
async fn list_databases_wraps_upstream_failure() {
    let (service, _) = service(FakeMetabaseClient {
        databases: Err("API error".to_owned()),
        ..FakeMetabaseClient::new()
    });

    let listing = service
        .list_databases(&CallContext::new(), &PageToken::default())
        .await;

    let Err(error) = listing.result else {
        panic!("listing should fail");
    };
    assert!(matches!(error, AppError::RemoteFetch { .. }));
    assert!(
        error
            .to_string()
            .contains("failed to list databases: API error")
    );
}

#[tokio::test]
async fn list_grants_translates_write_and_access() {
    let (service, client) = service(FakeMetabaseClient {
        matrix: Ok(PermissionMatrix::new(HashMap::from([
            (
                "group3".to_owned(),
                HashMap::from([("1".to_owned(), GroupPermission::native("write"))]),
            ),
            (
                "group4".to_owned(),
                HashMap::from([("1".to_owned(), GroupPermission::native(""))]),
            ),
        ]))),
        ..FakeMetabaseClient::new()
    });

    let listing = service
        .list_grants(&CallContext::new(), &sales_database(), &PageToken::default())
        .await;

    assert!(listing.annotations.is_empty());
    let Ok(page) = listing.result else {
        panic!("grants listing should succeed");
    };
    assert!(page.next_page_token.is_empty());

    let pairs: HashSet<(String, DatabaseEntitlement)> = page
        .items
        .iter()
        .map(|grant| {
            (
                grant.principal().resource().to_owned(),
                grant.entitlement().slug(),
            )
        })
        .collect();

    assert!(pairs.contains(&("group3".to_owned(), DatabaseEntitlement::Access)));
    assert!(pairs.contains(&("group3".to_owned(), DatabaseEntitlement::Write)));
    assert!(pairs.contains(&("group4".to_owned(), DatabaseEntitlement::Access)));
    assert!(!pairs.contains(&("group4".to_owned(), DatabaseEntitlement::Write)));
    assert_eq!(
        client.requested_matrices.lock().await.as_slice(),
        &[DatabaseId::new("1")]
    );
}

#[tokio::test]
async fn list_grants_keeps_rate_limit_when_fetch_fails() {
    let (service, _) = service(FakeMetabaseClient {
        matrix: Err("rate limit error".to_owned()),
        rate_limit: Some(rate_limit(50, 0)),
        ..FakeMetabaseClient::new()
    });

    let listing = service
        .list_grants(&CallContext::new(), &sales_database(), &PageToken::default())
        .await;

    assert!(listing.result.is_err());
    assert_eq!(listing.annotations.len(), 1);
}

#[tokio::test]
async fn translate_grants_wraps_upstream_failure() {
    let (service, _) = service(FakeMetabaseClient {
        matrix: Err("API error".to_owned()),
        ..FakeMetabaseClient::new()
    });

    let response = service
        .translate_grants(&CallContext::new(), &sales_database())
        .await;

    let Err(error) = response.result else {
        panic!("translation should fail");
    };
    assert!(
        error
            .to_string()
            .contains("failed to list database permissions: API error")
    );
}

#[tokio::test]
async fn translate_grants_rejects_non_database_resource() {
    let (service, client) = service(FakeMetabaseClient::new());
    let Ok(group) = Resource::new(ResourceId::new(ResourceType::Group, "3"), "Analysts") else {
        panic!("group resource should be valid");
    };

    let response = service.translate_grants(&CallContext::new(), &group).await;

    assert!(matches!(response.result, Err(AppError::Validation(_))));
    assert!(client.requested_matrices.lock().await.is_empty());
}

#[tokio::test]
async fn list_entitlements_offers_access_and_write() {
    let (service, client) = service(FakeMetabaseClient::new());

    let listing = service
        .list_entitlements(&CallContext::new(), &sales_database(), &PageToken::default())
        .await;

    let Ok(page) = listing.result else {
        panic!("entitlement listing should succeed");
    };
    let ids: Vec<&str> = page.items.iter().map(|entitlement| entitlement.id()).collect();
    assert_eq!(ids, vec!["database:1:access", "database:1:write"]);
    assert!(client.requested_matrices.lock().await.is_empty());
}
