use chrono::{DateTime, Utc};
use metagov_domain::{Database, PermissionMatrix, RateLimitDescription};
use reqwest::header::HeaderMap;
use serde::Deserialize;

const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// `GET /api/database` answers either with a bare array or wrapped in `data`
/// depending on the Metabase version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum DatabaseListing {
    Wrapped { data: Vec<Database> },
    Plain(Vec<Database>),
}

impl DatabaseListing {
    pub(super) fn into_databases(self) -> Vec<Database> {
        match self {
            Self::Wrapped { data } => data,
            Self::Plain(databases) => databases,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PermissionGraph {
    #[serde(default)]
    pub(super) revision: Option<i64>,
    #[serde(default)]
    pub(super) groups: PermissionMatrix,
}

/// Reads rate-limit headers. Both limit and remaining must be present.
pub(super) fn parse_rate_limit(headers: &HeaderMap) -> Option<RateLimitDescription> {
    let limit = header_u64(headers, RATE_LIMIT_LIMIT)?;
    let remaining = header_u64(headers, RATE_LIMIT_REMAINING)?;
    let reset_at = header_i64(headers, RATE_LIMIT_RESET)
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0));

    Some(RateLimitDescription {
        limit,
        remaining,
        reset_at,
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    header_str(headers, name).and_then(|value| value.parse().ok())
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    header_str(headers, name).and_then(|value| value.parse().ok())
}
