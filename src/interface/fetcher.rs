use crate::{OwnerNamePair, Response, StdResult};

/// A trait for fetching repository data from the API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryFetcher: Sync + Send {
    /// Fetches the repository data from the API.
    async fn fetch(&self, repository: &OwnerNamePair) -> StdResult<Response>;
}
