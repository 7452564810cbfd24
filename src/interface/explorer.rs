use crate::{Language, Repository, Showcase, StdResult, TrendingPeriod};

/// A trait for exploring trending repositories and curated collections.
#[async_trait::async_trait]
pub trait GitHubExplorer: Sync + Send {
    /// Retrieves one repository from the API.
    async fn get_repository(&self, owner: &str, name: &str) -> StdResult<Repository>;

    /// Retrieves the trending repositories, in listing order.
    async fn get_trending_repositories(
        &self,
        period: TrendingPeriod,
        language: Option<&str>,
    ) -> StdResult<Vec<Repository>>;

    /// Retrieves the languages the trending listing can be filtered with.
    async fn get_languages(&self) -> StdResult<Vec<Language>>;

    /// Retrieves every curated collection, across all the index pages.
    async fn get_showcases(&self) -> StdResult<Vec<Showcase>>;

    /// Retrieves the repositories of one curated collection, in listing order.
    async fn get_showcase_repositories(&self, slug: &str) -> StdResult<Vec<Repository>>;
}
