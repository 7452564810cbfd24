mod explorer;
mod fetcher;
mod observer;
mod page_fetcher;

pub use explorer::*;
pub use fetcher::*;
pub use observer::*;
pub use page_fetcher::*;
