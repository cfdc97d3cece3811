//! Application services and ports.

#![forbid(unsafe_code)]

mod action_manager;
mod database_service;
mod metabase_ports;
mod user_lifecycle_service;

pub use action_manager::{ActionField, ActionFieldType, ActionManager, ActionSchema, UserAction};
pub use database_service::DatabaseService;
pub use metabase_ports::{
    ActionOutcome, Annotated, CallContext, MetabaseClient, Page, PageToken, RemoteResponse,
    UserStateMutator,
};
pub use user_lifecycle_service::{
    ObservedUserState, TargetUserState, UserActionArgs, UserLifecycleService,
};
