use std::sync::Arc;

use log::{info, warn};

use crate::{
    GitHubExplorer, HtmlExtractor, Language, OwnerNamePair, PageFetcher, PageRequest, Repository,
    RepositoryFetcher, Showcase, ShowcaseWalker, StdResult, TrendingPeriod,
};

/// What to do when a repository of a listing cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemFailurePolicy {
    /// Fail the whole listing.
    #[default]
    Abort,

    /// Log the failure and leave the repository out of the listing.
    Skip,
}

/// Configuration of an `ExplorerClient`.
#[derive(Debug, Clone, Default)]
pub struct ExplorerClientConfig {
    pub item_failure_policy: ItemFailurePolicy,
}

/// Explores GitHub by combining the website pages with the REST API.
///
/// Repositories of a listing are fetched one at a time in listing order, so that
/// the rate limit observed on each response paces the next request.
pub struct ExplorerClient {
    repository_fetcher: Arc<dyn RepositoryFetcher>,
    page_fetcher: Arc<dyn PageFetcher>,
    config: ExplorerClientConfig,
}

impl ExplorerClient {
    /// Creates a new `ExplorerClient` instance with the given fetchers.
    pub fn new(
        repository_fetcher: Arc<dyn RepositoryFetcher>,
        page_fetcher: Arc<dyn PageFetcher>,
        config: ExplorerClientConfig,
    ) -> Self {
        Self {
            repository_fetcher,
            page_fetcher,
            config,
        }
    }

    async fn resolve_repositories(&self, pairs: Vec<OwnerNamePair>) -> StdResult<Vec<Repository>> {
        let mut repositories = Vec::with_capacity(pairs.len());
        for pair in pairs {
            match self.repository_fetcher.fetch(&pair).await {
                Ok(response) => repositories.push(response.into_repository()),
                Err(e) if self.config.item_failure_policy == ItemFailurePolicy::Skip => {
                    warn!("Skipping repository {pair}: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(repositories)
    }
}

#[async_trait::async_trait]
impl GitHubExplorer for ExplorerClient {
    async fn get_repository(&self, owner: &str, name: &str) -> StdResult<Repository> {
        let response = self
            .repository_fetcher
            .fetch(&OwnerNamePair::new(owner, name))
            .await?;

        Ok(response.into_repository())
    }

    async fn get_trending_repositories(
        &self,
        period: TrendingPeriod,
        language: Option<&str>,
    ) -> StdResult<Vec<Repository>> {
        let document = self
            .page_fetcher
            .fetch_page(&PageRequest::trending(period, language))
            .await?;
        let pairs = HtmlExtractor::trending_repositories(&document);
        info!(
            "Found {} trending repositories (since={period}, language={language:?})",
            pairs.len()
        );

        self.resolve_repositories(pairs).await
    }

    async fn get_languages(&self) -> StdResult<Vec<Language>> {
        let document = self
            .page_fetcher
            .fetch_page(&PageRequest::trending_index())
            .await?;

        Ok(HtmlExtractor::languages(&document))
    }

    async fn get_showcases(&self) -> StdResult<Vec<Showcase>> {
        ShowcaseWalker::new(self.page_fetcher.clone()).walk().await
    }

    async fn get_showcase_repositories(&self, slug: &str) -> StdResult<Vec<Repository>> {
        let document = self
            .page_fetcher
            .fetch_page(&PageRequest::showcase_detail(slug))
            .await?;
        let pairs = HtmlExtractor::showcase_repositories(&document);
        info!("Found {} repositories in collection {slug}", pairs.len());

        self.resolve_repositories(pairs).await
    }
}
