use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// Explorer error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExplorerError {
    /// The access token is empty or missing
    #[error("Invalid credential: an access token is required")]
    InvalidCredential,

    /// A request failed at the HTTP layer or returned an unusable response
    #[error("Fetch failure on {endpoint} (status: {status:?}): {message}")]
    FetchFailure {
        /// The URL that was requested.
        endpoint: String,
        /// The HTTP status, if a response was received.
        status: Option<u16>,
        /// A description of the failure.
        message: String,
    },
}

impl ExplorerError {
    /// Creates a `FetchFailure` for the given endpoint.
    pub fn fetch_failure(endpoint: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::FetchFailure {
            endpoint: endpoint.to_string(),
            status,
            message: message.into(),
        }
    }
}

/// Malformed record condition raised while evaluating an extraction schema.
///
/// It never leaves the extractor: the offending element is dropped from the results.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// The selector of a rule could not be parsed
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),

    /// No element matched the selector of a field
    #[error("field `{field}`: no element matches `{selector}`")]
    MissingElement {
        field: &'static str,
        selector: &'static str,
    },

    /// The element of a field does not carry the attribute
    #[error("field `{field}`: attribute `{attribute}` is missing")]
    MissingAttribute {
        field: &'static str,
        attribute: &'static str,
    },

    /// The record has no value for a field its schema does not declare
    #[error("field `{0}` is not part of the schema")]
    UnknownField(&'static str),

    /// A link cannot be resolved against the website
    #[error("link `{0}` cannot be resolved")]
    InvalidLink(String),

    /// A path does not have enough non-empty segments
    #[error("path `{0}` is missing a segment")]
    MissingSegment(String),
}
