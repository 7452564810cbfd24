use super::{FetcherRateLimit, Repository};

/// A response containing a repository and the rate limit observed while fetching it.
#[derive(Debug, PartialEq)]
pub struct Response {
    /// Retrieved repository
    pub(crate) repository: Repository,

    /// The API rate limit information, when the response advertised it
    pub(crate) rate_limit: Option<FetcherRateLimit>,
}

impl Response {
    /// Creates a new `Response` instance.
    pub fn new(repository: Repository, rate_limit: Option<FetcherRateLimit>) -> Self {
        Self {
            repository,
            rate_limit,
        }
    }

    /// Retrieves the repository.
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Retrieves the API rate limit information.
    pub fn rate_limit(&self) -> Option<&FetcherRateLimit> {
        self.rate_limit.as_ref()
    }

    /// Consumes the response, keeping the repository.
    pub fn into_repository(self) -> Repository {
        self.repository
    }
}
