//! Error types for the alarmfax-core library.

use thiserror::Error;

/// Main error type for the alarmfax library.
#[derive(Error, Debug)]
pub enum AlarmFaxError {
    /// A configured pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value the parser cannot work with.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the extraction stages.
///
/// Empty input is deliberately absent here: it produces a minimal field map
/// instead of an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The provider signature was not found in the raw text.
    #[error("not an alarm fax: signature `{signature}` not found")]
    NotAnAlarmDocument { signature: String },

    /// A section anchor is missing or out of order.
    #[error("malformed document: section anchor `{anchor}` missing or out of order")]
    MalformedDocument { anchor: String },

    /// A required address label is missing from the location section.
    #[error("malformed address: label `{anchor}` missing")]
    MalformedAddress { anchor: String },

    /// The incident number label is missing.
    #[error("malformed incident number: label `{anchor}` missing")]
    MalformedIncidentNumber { anchor: String },
}

impl ExtractionError {
    /// Pipeline stage that raised the error.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::NotAnAlarmDocument { .. } => "signature",
            Self::MalformedDocument { .. } => "segmentation",
            Self::MalformedAddress { .. } => "address",
            Self::MalformedIncidentNumber { .. } => "incident_number",
        }
    }

    /// Short name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAnAlarmDocument { .. } => "NotAnAlarmDocument",
            Self::MalformedDocument { .. } => "MalformedDocument",
            Self::MalformedAddress { .. } => "MalformedAddress",
            Self::MalformedIncidentNumber { .. } => "MalformedIncidentNumber",
        }
    }

    /// The literal that was looked for and not found.
    pub fn anchor(&self) -> &str {
        match self {
            Self::NotAnAlarmDocument { signature } => signature,
            Self::MalformedDocument { anchor }
            | Self::MalformedAddress { anchor }
            | Self::MalformedIncidentNumber { anchor } => anchor,
        }
    }
}

/// Result type for the alarmfax library.
pub type Result<T> = std::result::Result<T, AlarmFaxError>;
