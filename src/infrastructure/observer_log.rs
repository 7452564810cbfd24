use std::time::Duration;

use log::warn;

use crate::{FetcherRateLimit, RateLimitObserver};

/// Reports rate limit pauses through the `log` facade.
#[derive(Debug, Default)]
pub struct LogRateLimitObserver;

impl RateLimitObserver for LogRateLimitObserver {
    fn on_pause(&self, rate_limit: &FetcherRateLimit, wait: Duration) {
        warn!("Fetcher rate limit running low ({rate_limit}), waiting for {wait:?}");
    }
}
