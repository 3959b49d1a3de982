//! Error types for fetching and parsing resources.

use thiserror::Error;

/// Failures while retrieving a URL or decoding the resource list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request failed, timed out, or returned a non-success status
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The resource list body is not a JSON array of strings
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures while parsing a single CSV resource.
///
/// Any of these causes the resource to be skipped as a whole.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A data row did not have exactly three fields
    #[error("malformed row at line {line}: expected 3 fields, found {fields}")]
    MalformedRow { line: u64, fields: usize },

    /// A signal reading was not a float, under the reject policy
    #[error("invalid signal reading {value:?} at line {line}")]
    InvalidReading { line: u64, value: String },

    /// A matching row has a field that is not valid UTF-8
    #[error("invalid UTF-8 in field {field} at line {line}")]
    InvalidText { line: u64, field: usize },

    /// The CSV reader itself failed
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ParseError {
    /// Short machine-readable label, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Fetch(FetchError::InvalidUrl { .. }) => "invalid_url",
            ParseError::Fetch(FetchError::Network(_)) => "network",
            ParseError::Fetch(FetchError::Decode(_)) => "decode",
            ParseError::MalformedRow { .. } => "malformed_row",
            ParseError::InvalidReading { .. } => "invalid_reading",
            ParseError::InvalidText { .. } => "invalid_text",
            ParseError::Csv(_) => "csv",
        }
    }
}
