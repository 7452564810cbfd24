use std::time::Duration;

use crate::FetcherRateLimit;

/// A trait notified when a fetcher pauses to let the API rate limit recover.
#[cfg_attr(test, mockall::automock)]
pub trait RateLimitObserver: Sync + Send {
    /// Called right before pausing for `wait`.
    fn on_pause(&self, rate_limit: &FetcherRateLimit, wait: Duration);
}
