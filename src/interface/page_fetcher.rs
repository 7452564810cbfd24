use crate::{PageRequest, StdResult};

/// A trait for fetching the HTML pages of the website.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PageFetcher: Sync + Send {
    /// Fetches the raw HTML document of a page.
    async fn fetch_page(&self, request: &PageRequest) -> StdResult<String>;
}
