use std::env;
use std::time::Duration;

use metagov_core::{AppError, AppResult};
use metagov_infrastructure::MetabaseClientConfig;
use url::Url;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub base_url: Url,
    pub api_key: String,
    pub http_timeout: Duration,
    pub call_deadline: Option<Duration>,
}

impl ConnectorConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let base_url = required(&lookup, "METABASE_BASE_URL")?;
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|error| {
            AppError::Validation(format!("invalid METABASE_BASE_URL '{base_url}': {error}"))
        })?;
        let api_key = required(&lookup, "METABASE_API_KEY")?;

        let http_timeout_secs = parse_u64(&lookup, "METABASE_HTTP_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "METABASE_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let call_deadline = parse_u64(&lookup, "METABASE_CALL_DEADLINE_SECS")?
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs);

        Ok(Self {
            base_url,
            api_key,
            http_timeout: Duration::from_secs(http_timeout_secs),
            call_deadline,
        })
    }

    pub fn client_config(&self) -> MetabaseClientConfig {
        MetabaseClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            request_timeout: self.http_timeout,
        }
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<Option<u64>> {
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value.trim().parse::<u64>().map(Some).map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(None),
    }
}
