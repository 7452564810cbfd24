use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::time::sleep;

use crate::{OwnerNamePair, RateLimitObserver, RepositoryFetcher, Response, StdResult};

/// The remaining quota under which the enforcer starts pausing.
pub const RATE_LIMIT_THRESHOLD: u64 = 400;

/// The delay added after the advertised reset before resuming.
pub const RATE_LIMIT_RESET_MARGIN: Duration = Duration::from_secs(60);

/// This struct is responsible for enforcing rate limits on fetcher requests.
///
/// When the remaining quota runs low, the fetched response is held back until the
/// quota resets, which delays whatever the caller does next.
pub struct FetcherRateLimitEnforcer {
    /// The fetcher to be rate limited.
    fetcher: Arc<dyn RepositoryFetcher>,

    /// Notified before each pause.
    observer: Arc<dyn RateLimitObserver>,

    /// The source of the current time.
    clock: fn() -> DateTime<Utc>,
}

impl FetcherRateLimitEnforcer {
    /// Creates a new `FetcherRateLimitEnforcer` instance with the given fetcher.
    pub fn new(fetcher: Arc<dyn RepositoryFetcher>, observer: Arc<dyn RateLimitObserver>) -> Self {
        Self {
            fetcher,
            observer,
            clock: Utc::now,
        }
    }

    /// Replaces the source of the current time.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for FetcherRateLimitEnforcer {
    /// Enforce the rate limit on the fetcher requests.
    async fn fetch(&self, repository: &OwnerNamePair) -> StdResult<Response> {
        let response = self.fetcher.fetch(repository).await?;
        if let Some(rate_limit) = response.rate_limit()
            && rate_limit.is_running_low(RATE_LIMIT_THRESHOLD)
        {
            let duration_until_reset =
                rate_limit.duration_until_reset((self.clock)(), RATE_LIMIT_RESET_MARGIN);
            self.observer.on_pause(rate_limit, duration_until_reset);
            sleep(duration_until_reset).await;
        }

        Ok(response)
    }
}
