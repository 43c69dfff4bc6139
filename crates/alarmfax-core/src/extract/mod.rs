//! Alarm fax field extraction module.

mod parser;
pub mod rules;

pub use parser::{AlarmFaxParser, ExtractionResult};

use crate::error::ExtractionError;
use crate::models::fields::FieldMap;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for alarm fax extractors.
pub trait AlarmExtractor {
    /// Run the pipeline on non-empty text, surfacing the first failure.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;

    /// Extract the field map. Never fails: failures become a single
    /// diagnostic field, absent or empty input a minimal map.
    fn extract(&self, input: Option<&str>) -> FieldMap;
}
