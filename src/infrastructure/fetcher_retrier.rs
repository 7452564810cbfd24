use std::{sync::Arc, time::Duration};

use log::warn;
use tokio::time::sleep;

use crate::{OwnerNamePair, RepositoryFetcher, Response, StdResult};

/// Retries a `RepositoryFetcher` with an exponential backoff, up to a maximum
/// number of attempts.
pub struct FetcherRetrier {
    fetcher: Arc<dyn RepositoryFetcher>,

    /// At least one attempt is always made.
    max_attempts: u32,

    /// The pause after the first failure, doubled after each further failure.
    base_delay: Duration,
}

impl FetcherRetrier {
    /// Creates a new `FetcherRetrier` around the given fetcher.
    pub fn new(
        fetcher: Arc<dyn RepositoryFetcher>,
        max_attempts: u32,
        base_delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    fn backoff_delay(&self, failures: u32) -> Duration {
        self.base_delay * 2u32.pow(failures.saturating_sub(1).min(16))
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for FetcherRetrier {
    async fn fetch(&self, repository: &OwnerNamePair) -> StdResult<Response> {
        let mut failures = 0;
        loop {
            let error = match self.fetcher.fetch(repository).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };
            failures += 1;
            if failures >= self.max_attempts {
                return Err(error.context(format!("Failed after {failures} attempts")));
            }
            let delay = self.backoff_delay(failures);
            warn!("Fetch attempt #{failures} of {repository} failed: {error}");
            sleep(delay).await;
        }
    }
}
