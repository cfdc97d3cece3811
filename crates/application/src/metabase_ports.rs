mod client;
mod context;
mod response;

pub use client::{MetabaseClient, UserStateMutator};
pub use context::CallContext;
pub use response::{ActionOutcome, Annotated, Page, PageToken, RemoteResponse};
