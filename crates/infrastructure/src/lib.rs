//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod metabase_http_client;

pub use metabase_http_client::{MetabaseClientConfig, MetabaseHttpClient};
