use std::time::Duration;

use async_trait::async_trait;
use metagov_application::{
    ActionOutcome, Annotated, CallContext, MetabaseClient, RemoteResponse, UserStateMutator,
};
use metagov_core::{AppError, AppResult};
use metagov_domain::{Annotations, Database, DatabaseId, MetabaseUser, PermissionMatrix};
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

mod wire;

use wire::{DatabaseListing, PermissionGraph, parse_rate_limit};

/// Connection settings for the Metabase REST API.
#[derive(Debug, Clone)]
pub struct MetabaseClientConfig {
    /// Base URL of the Metabase instance, e.g. `https://metabase.example.com`.
    pub base_url: Url,
    /// API key sent in the `x-api-key` header.
    pub api_key: String,
    /// Per-request transport timeout.
    pub request_timeout: Duration,
}

/// REST implementation of the Metabase ports.
///
/// Requests are not retried; every call honors the caller's [`CallContext`].
#[derive(Clone)]
pub struct MetabaseHttpClient {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl MetabaseHttpClient {
    /// Creates a client around an existing HTTP client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Builds the HTTP client from connection settings.
    pub fn from_config(config: MetabaseClientConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self::new(http_client, config.base_url, config.api_key))
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Validation(format!(
                    "Metabase base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn call<T>(
        &self,
        context: &CallContext,
        operation: &str,
        method: Method,
        segments: &[&str],
    ) -> RemoteResponse<T>
    where
        T: DeserializeOwned,
    {
        let url = match self.endpoint(segments) {
            Ok(url) => url,
            Err(error) => return RemoteResponse::err(error, None),
        };

        debug!(%method, %url, operation, "calling Metabase");
        let request = self
            .http_client
            .request(method, url)
            .header("x-api-key", self.api_key.as_str())
            .header(ACCEPT, "application/json");

        let mut rate_limit = None;
        let result = context
            .run(operation, async {
                let response = request.send().await.map_err(|error| {
                    AppError::Remote(format!("{operation} transport error: {error}"))
                })?;
                rate_limit = parse_rate_limit(response.headers());

                let status = response.status();
                if status == StatusCode::NOT_FOUND {
                    return Err(AppError::NotFound(format!(
                        "{operation} returned status 404"
                    )));
                }

                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<body unavailable>".to_owned());
                    return Err(AppError::Remote(format!(
                        "{operation} returned status {}: {body}",
                        status.as_u16()
                    )));
                }

                let body = response.bytes().await.map_err(|error| {
                    AppError::Remote(format!("failed to read {operation} response body: {error}"))
                })?;
                let body: &[u8] = if body.is_empty() { b"null" } else { &body };

                serde_json::from_slice::<T>(body).map_err(|error| {
                    AppError::Remote(format!("failed to parse {operation} response body: {error}"))
                })
            })
            .await;

        RemoteResponse { result, rate_limit }
    }

    async fn mutate(
        &self,
        context: &CallContext,
        operation: &str,
        method: Method,
        segments: &[&str],
    ) -> Annotated<ActionOutcome> {
        let response = self
            .call::<Value>(context, operation, method, segments)
            .await;

        Annotated {
            result: response.result.map(|_| ActionOutcome::succeeded()),
            annotations: Annotations::from(response.rate_limit),
        }
    }
}

#[async_trait]
impl MetabaseClient for MetabaseHttpClient {
    async fn list_databases(&self, context: &CallContext) -> RemoteResponse<Vec<Database>> {
        let response = self
            .call::<DatabaseListing>(context, "list databases", Method::GET, &["api", "database"])
            .await;

        RemoteResponse {
            result: response.result.map(DatabaseListing::into_databases),
            rate_limit: response.rate_limit,
        }
    }

    async fn get_permission_matrix(
        &self,
        context: &CallContext,
        database_id: &DatabaseId,
    ) -> RemoteResponse<PermissionMatrix> {
        let response = self
            .call::<PermissionGraph>(
                context,
                "get permission graph",
                Method::GET,
                &["api", "permissions", "graph", "db", database_id.as_str()],
            )
            .await;

        RemoteResponse {
            result: response.result.map(|graph| {
                debug!(
                    database_id = %database_id,
                    revision = ?graph.revision,
                    groups = graph.groups.group_count(),
                    "fetched permission graph"
                );
                graph.groups
            }),
            rate_limit: response.rate_limit,
        }
    }

    async fn get_user_by_id(
        &self,
        context: &CallContext,
        user_id: &str,
    ) -> RemoteResponse<MetabaseUser> {
        self.call(context, "get user", Method::GET, &["api", "user", user_id])
            .await
    }
}

#[async_trait]
impl UserStateMutator for MetabaseHttpClient {
    async fn enable_user(&self, context: &CallContext, user_id: &str) -> Annotated<ActionOutcome> {
        self.mutate(
            context,
            "reactivate user",
            Method::PUT,
            &["api", "user", user_id, "reactivate"],
        )
        .await
    }

    async fn disable_user(
        &self,
        context: &CallContext,
        user_id: &str,
    ) -> Annotated<ActionOutcome> {
        self.mutate(
            context,
            "deactivate user",
            Method::DELETE,
            &["api", "user", user_id],
        )
        .await
    }
}
