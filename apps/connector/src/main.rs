//! Metagov connector runtime.

#![forbid(unsafe_code)]

mod command;
mod connector_config;

use std::env;
use std::sync::Arc;

use metagov_application::{
    ActionManager, Annotated, CallContext, DatabaseService, PageToken, UserLifecycleService,
};
use metagov_core::{AppError, AppResult};
use metagov_domain::{Annotations, Resource};
use metagov_infrastructure::MetabaseHttpClient;
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::Command;
use crate::connector_config::ConnectorConfig;

#[derive(Debug, Serialize)]
struct CommandOutput<'a, T> {
    result: T,
    annotations: &'a Annotations,
}

struct Services {
    database_service: DatabaseService,
    action_manager: ActionManager,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let command = Command::parse(env::args().skip(1))?;
    let config = ConnectorConfig::load()?;
    let services = build_services(&config)?;

    let cancellation = CancellationToken::new();
    watch_interrupt(cancellation.clone());
    let mut context = CallContext::with_cancellation(cancellation);
    if let Some(call_deadline) = config.call_deadline {
        context = context.with_timeout(call_deadline);
    }

    info!(
        command = command.name(),
        base_url = %config.base_url,
        "metagov-connector started"
    );

    run_command(&services, &context, command).await
}

fn build_services(config: &ConnectorConfig) -> AppResult<Services> {
    let client = Arc::new(MetabaseHttpClient::from_config(config.client_config())?);
    let user_lifecycle_service = UserLifecycleService::new(client.clone(), client.clone());

    Ok(Services {
        database_service: DatabaseService::new(client),
        action_manager: ActionManager::new(user_lifecycle_service),
    })
}

async fn run_command(services: &Services, context: &CallContext, command: Command) -> AppResult<()> {
    match command {
        Command::Databases => {
            let response = services
                .database_service
                .list_databases(context, &PageToken::default())
                .await;
            emit(response)
        }
        Command::Entitlements { database_id } => {
            let (database, mut annotations) =
                find_database(services, context, database_id.as_str()).await?;
            let response = services
                .database_service
                .list_entitlements(context, &database, &PageToken::default())
                .await;
            annotations.merge(response.annotations);
            emit(Annotated {
                result: response.result,
                annotations,
            })
        }
        Command::Grants { database_id } => {
            let (database, mut annotations) =
                find_database(services, context, database_id.as_str()).await?;
            let response = services
                .database_service
                .list_grants(context, &database, &PageToken::default())
                .await;
            annotations.merge(response.annotations);
            emit(Annotated {
                result: response.result,
                annotations,
            })
        }
        Command::Actions => emit(Annotated::ok(
            services.action_manager.list_actions(),
            Annotations::new(),
        )),
        Command::Invoke { action, user_id } => {
            let response = services
                .action_manager
                .invoke(context, action.as_str(), &json!({ "userId": user_id }))
                .await;
            emit(response)
        }
    }
}

/// Resolves a database id to its listed resource so grants carry its display name.
async fn find_database(
    services: &Services,
    context: &CallContext,
    database_id: &str,
) -> AppResult<(Resource, Annotations)> {
    let response = services
        .database_service
        .list_databases(context, &PageToken::default())
        .await;
    let annotations = response.annotations;
    let page = response.result?;

    page.items
        .into_iter()
        .find(|resource| resource.id().resource() == database_id)
        .map(|resource| (resource, annotations))
        .ok_or_else(|| AppError::NotFound(format!("database {database_id}")))
}

fn emit<T: Serialize>(response: Annotated<T>) -> AppResult<()> {
    let Annotated {
        result,
        annotations,
    } = response;

    match result {
        Ok(result) => {
            let output = serde_json::to_string_pretty(&CommandOutput {
                result,
                annotations: &annotations,
            })
            .map_err(|error| AppError::Internal(format!("failed to encode output: {error}")))?;
            println!("{output}");
            Ok(())
        }
        Err(error) => {
            for rate_limit in annotations.rate_limits() {
                warn!(
                    limit = rate_limit.limit,
                    remaining = rate_limit.remaining,
                    "rate limit reported by failed command"
                );
            }
            Err(error)
        }
    }
}

fn watch_interrupt(cancellation: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling in-flight calls");
            cancellation.cancel();
        }
    });
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
