use anyhow::Context;
use log::debug;
use reqwest::Client;

use crate::{ExplorerError, PageFetcher, PageRequest, StdResult, USER_AGENT};

/// The website production endpoint for GitHub.
pub const GITHUB_WEB_ENDPOINT: &str = "https://github.com";

/// Asks the website for the page fragment only.
const PARTIAL_PAGE_HEADER: &str = "X-PJAX";

/// Fetches HTML pages from the website.
pub struct HtmlPageFetcher {
    client: Client,
    endpoint: String,
}

impl HtmlPageFetcher {
    /// Creates a new `HtmlPageFetcher` instance for the given endpoint.
    pub fn try_new(endpoint: &str) -> StdResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to build the website client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, request: &PageRequest) -> String {
        match request {
            PageRequest::Trending { .. } => format!("{}/trending", self.endpoint),
            PageRequest::ShowcaseIndex { .. } => format!("{}/collections", self.endpoint),
            PageRequest::ShowcaseDetail { slug } => format!(
                "{}/collections/{}",
                self.endpoint,
                urlencoding::encode(slug)
            ),
        }
    }

    fn query(request: &PageRequest) -> Vec<(&'static str, String)> {
        match request {
            PageRequest::Trending { period, language } => {
                let mut query = vec![];
                if let Some(period) = period {
                    query.push(("since", period.to_string()));
                }
                if let Some(language) = language {
                    query.push(("l", language.to_owned()));
                }
                query
            }
            PageRequest::ShowcaseIndex { after: Some(after) } => {
                vec![("after", after.to_string())]
            }
            PageRequest::ShowcaseIndex { after: None } | PageRequest::ShowcaseDetail { .. } => {
                vec![]
            }
        }
    }
}

#[async_trait::async_trait]
impl PageFetcher for HtmlPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> StdResult<String> {
        let endpoint = self.url(request);
        debug!("Fetching page {request} from {endpoint}");
        let mut builder = self.client.get(&endpoint).query(&Self::query(request));
        if let PageRequest::Trending { .. } = request {
            builder = builder.header(PARTIAL_PAGE_HEADER, "true");
        }
        let response = builder
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

        Ok(response.text().await.map_err(|e| {
            ExplorerError::fetch_failure(&endpoint, Some(status.as_u16()), e.to_string())
        })?)
    }
}
