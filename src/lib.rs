//! Retrieves trending repositories, trending languages and curated collections
//! from GitHub.
//!
//! The website pages are scraped with declarative extraction schemas, while the
//! repositories themselves are resolved one by one through the REST API, pausing
//! whenever the API rate limit runs low.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
