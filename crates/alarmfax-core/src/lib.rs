//! Core library for ILS dispatch fax extraction.
//!
//! This crate provides:
//! - OCR noise normalization for alarm fax transcripts
//! - Section splitting by anchor keywords (location, reason, resources, remarks)
//! - Address and dispatched-unit parsing with plain and HTML renderings
//! - A controller that turns any input into a flat field map

pub mod error;
pub mod models;
pub mod extract;

pub use error::{AlarmFaxError, ExtractionError, Result};
pub use models::alarm::{AddressFields, ResourceList, ResourceRecord, SectionSet};
pub use models::config::AlarmFaxConfig;
pub use models::fields::{Diagnostic, Field, FieldMap};
pub use extract::{AlarmExtractor, AlarmFaxParser, ExtractionResult};
