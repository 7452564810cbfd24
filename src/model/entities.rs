use std::{fmt::Display, ops::Deref, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// API attributes that never make it into a `Repository`.
///
/// `permissions` describes the caller, not the repository. `name` is carried by a
/// dedicated field.
const STRIPPED_ATTRIBUTES: [&str; 2] = ["permissions", "name"];

/// The key the API `owner` object is kept under, as `owner` holds the login.
pub const OWNER_DETAILS_ATTRIBUTE: &str = "owner_details";

/// Metadata of a GitHub repository.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Repository {
    /// The login of the repository owner.
    owner: String,

    /// The name of the repository.
    name: String,

    /// Every other attribute returned by the API.
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl Repository {
    /// Creates a new `Repository` instance, discarding the stripped attributes.
    ///
    /// The API `owner` object is moved under [OWNER_DETAILS_ATTRIBUTE].
    pub fn new(owner: &str, name: &str, mut attributes: Map<String, Value>) -> Self {
        for key in STRIPPED_ATTRIBUTES {
            attributes.remove(key);
        }
        if let Some(details) = attributes.remove("owner") {
            attributes.insert(OWNER_DETAILS_ATTRIBUTE.to_string(), details);
        }

        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            attributes,
        }
    }

    /// Creates a `Repository` from an API body.
    ///
    /// The owner login and name reported by the API win over the requested pair, as
    /// the API follows renames. Returns `None` when the body is not a JSON object.
    pub fn from_api_body(requested: &OwnerNamePair, body: Value) -> Option<Self> {
        let Value::Object(attributes) = body else {
            return None;
        };
        let owner = attributes
            .get("owner")
            .and_then(|owner| owner.get("login"))
            .and_then(Value::as_str)
            .unwrap_or(requested.owner.as_str())
            .to_string();
        let name = attributes
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(requested.name.as_str())
            .to_string();

        Some(Self::new(&owner, &name, attributes))
    }

    /// Retrieves the owner login.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Retrieves the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retrieves the `owner/name` form of the repository.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Retrieves one API attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Retrieves all API attributes.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Repository: {}", self.full_name())
    }
}

/// A language listed in the trending language menu.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// The display name.
    pub name: String,

    /// The URL identifier, percent-decoded.
    pub slug: String,
}

impl Language {
    /// Creates a new `Language` instance.
    pub fn new(name: &str, slug: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }
}

/// A curated collection of repositories.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Showcase {
    pub slug: String,
    pub name: String,
    pub description: String,
    /// The URL of the illustration.
    pub image: String,
}

/// An owner and a repository name parsed from a link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerNamePair {
    pub owner: String,
    pub name: String,
}

impl OwnerNamePair {
    /// Creates a new `OwnerNamePair` instance.
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

impl Display for OwnerNamePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// An opaque token pointing at the next page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaginationCursor(pub String);

impl Deref for PaginationCursor {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for PaginationCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fetcher API rate limit, as advertised by the response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherRateLimit {
    /// The maximum number of requests that can be made in the current window, if advertised.
    pub limit: Option<u64>,
    /// The remaining number of requests that can be made in the current window.
    pub remaining: u64,
    /// The time at which the rate limit will reset.
    pub reset_at: DateTime<Utc>,
}

impl FetcherRateLimit {
    /// Whether the remaining quota dropped under the threshold.
    pub fn is_running_low(&self, threshold: u64) -> bool {
        self.remaining < threshold
    }

    /// Computes how long to wait from `now` until the reset, plus a safety margin.
    ///
    /// A reset in the past yields a zero duration once the margin is consumed.
    pub fn duration_until_reset(&self, now: DateTime<Utc>, margin: Duration) -> Duration {
        let seconds = self.reset_at.timestamp() - now.timestamp() + margin.as_secs() as i64;

        Duration::from_secs(seconds.max(0) as u64)
    }

    #[cfg(test)]
    /// Creates a dummy `FetcherRateLimit` instance for testing purposes.
    pub fn dummy() -> Self {
        Self {
            limit: Some(5000),
            remaining: 4999,
            reset_at: DateTime::from_timestamp(1_735_689_600, 0).unwrap(),
        }
    }
}

impl Display for FetcherRateLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.limit {
            Some(limit) => write!(
                f,
                "RateLimit: remaining={}/{limit}, reset={}",
                self.remaining, self.reset_at
            ),
            None => write!(
                f,
                "RateLimit: remaining={}, reset={}",
                self.remaining, self.reset_at
            ),
        }
    }
}
