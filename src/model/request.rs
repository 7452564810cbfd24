use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use serde::Serialize;

use super::PaginationCursor;

/// The time window of a trending listing.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendingPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TrendingPeriod {
    /// The value of the `since` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingPeriod::Daily => "daily",
            TrendingPeriod::Weekly => "weekly",
            TrendingPeriod::Monthly => "monthly",
        }
    }
}

impl Display for TrendingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrendingPeriod {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "daily" => Ok(TrendingPeriod::Daily),
            "weekly" => Ok(TrendingPeriod::Weekly),
            "monthly" => Ok(TrendingPeriod::Monthly),
            other => Err(anyhow!(
                "Unknown trending period `{other}`, expected one of: daily, weekly, monthly"
            )),
        }
    }
}

/// A request for an HTML page of the GitHub website
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum PageRequest {
    /// The trending page, fetched as a partial page.
    Trending {
        /// The `since` window, omitted when `None`.
        period: Option<TrendingPeriod>,
        /// The language slug filter, omitted when `None`.
        language: Option<String>,
    },

    /// One page of the collections index.
    ShowcaseIndex {
        /// The cursor of the page, `None` for the first page.
        after: Option<PaginationCursor>,
    },

    /// The detail page of one collection.
    ShowcaseDetail {
        /// The collection slug.
        slug: String,
    },
}

impl PageRequest {
    /// Creates a request for the trending page with the given filters.
    pub fn trending(period: TrendingPeriod, language: Option<&str>) -> Self {
        Self::Trending {
            period: Some(period),
            language: language.map(str::to_string),
        }
    }

    /// Creates a request for the unfiltered trending page.
    pub fn trending_index() -> Self {
        Self::Trending {
            period: None,
            language: None,
        }
    }

    /// Creates a request for a page of the collections index.
    pub fn showcase_index(after: Option<PaginationCursor>) -> Self {
        Self::ShowcaseIndex { after }
    }

    /// Creates a request for the detail page of a collection.
    pub fn showcase_detail(slug: &str) -> Self {
        Self::ShowcaseDetail {
            slug: slug.to_string(),
        }
    }
}

impl Display for PageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageRequest::Trending { period, language } => write!(
                f,
                "TrendingPageRequest: since={period:?}, language={language:?}"
            ),
            PageRequest::ShowcaseIndex { after } => {
                write!(f, "ShowcaseIndexPageRequest: after={after:?}")
            }
            PageRequest::ShowcaseDetail { slug } => {
                write!(f, "ShowcaseDetailPageRequest: slug={slug}")
            }
        }
    }
}
