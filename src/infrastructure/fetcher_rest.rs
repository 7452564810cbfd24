use anyhow::Context;
use chrono::DateTime;
use log::debug;
use reqwest::{Client, header::HeaderMap};

use crate::{
    ExplorerError, FetcherRateLimit, OwnerNamePair, Repository, RepositoryFetcher, Response,
    StdResult,
};

/// The REST API production endpoint for GitHub.
pub const GITHUB_API_ENDPOINT: &str = "https://api.github.com";

/// The user agent sent with every request, the API rejects anonymous agents.
pub const USER_AGENT: &str = concat!("github-explorer/", env!("CARGO_PKG_VERSION"));

/// The basic auth user name the API expects alongside a token password.
const BASIC_AUTH_USER: &str = "token";

const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Fetches repository data from the REST API.
pub struct RestFetcher {
    client: Client,
    endpoint: String,
    token: String,
}

impl RestFetcher {
    /// Creates a new `RestFetcher` instance for the given endpoint and access token.
    ///
    /// Fails with [ExplorerError::InvalidCredential] when the token is absent or blank.
    pub fn try_new(endpoint: &str, token: Option<&str>) -> StdResult<Self> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ExplorerError::InvalidCredential)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to build the REST API client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }
}

/// Reads the rate limit headers, `None` when they are absent or not numeric.
fn read_rate_limit(headers: &HeaderMap) -> Option<FetcherRateLimit> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
    };
    let remaining = read(RATE_LIMIT_REMAINING_HEADER)?;
    let reset_at = DateTime::from_timestamp(read(RATE_LIMIT_RESET_HEADER)?, 0)?;

    Some(FetcherRateLimit {
        limit: read(RATE_LIMIT_LIMIT_HEADER).map(|limit| limit.max(0) as u64),
        remaining: remaining.max(0) as u64,
        reset_at,
    })
}

#[async_trait::async_trait]
impl RepositoryFetcher for RestFetcher {
    async fn fetch(&self, repository: &OwnerNamePair) -> StdResult<Response> {
        let endpoint = format!(
            "{}/repos/{}/{}",
            self.endpoint,
            urlencoding::encode(&repository.owner),
            urlencoding::encode(&repository.name)
        );
        debug!("Fetching repository {repository} from {endpoint}");
        let response = self
            .client
            .get(&endpoint)
            .basic_auth(BASIC_AUTH_USER, Some(&self.token))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| ExplorerError::fetch_failure(&endpoint, None, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::fetch_failure(
                &endpoint,
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("unexpected status"),
            )
            .into());
        }
        let rate_limit = read_rate_limit(response.headers());
        let body = response.json::<serde_json::Value>().await.map_err(|e| {
            ExplorerError::fetch_failure(&endpoint, Some(status.as_u16()), e.to_string())
        })?;
        let repository = Repository::from_api_body(repository, body).ok_or_else(|| {
            ExplorerError::fetch_failure(
                &endpoint,
                Some(status.as_u16()),
                "response body is not a JSON object",
            )
        })?;

        Ok(Response::new(repository, rate_limit))
    }
}
