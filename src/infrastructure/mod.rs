mod explorer_client;
mod extractor_html;
mod fetcher_rate_limiter;
mod fetcher_rest;
mod fetcher_retrier;
mod observer_log;
mod page_fetcher_html;
mod showcase_walker;

pub use explorer_client::*;
pub use extractor_html::*;
pub use fetcher_rate_limiter::*;
pub use fetcher_rest::*;
pub use fetcher_retrier::*;
pub use observer_log::*;
pub use page_fetcher_html::*;
pub use showcase_walker::*;
