//! Output field vocabulary shared with the alerting system.
//!
//! Official keys of the consumer are used where one exists; everything else
//! carries a `custom_` prefix so it never collides with the consumer's own
//! parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Flat mapping from field key to value.
pub type FieldMap = BTreeMap<String, String>;

/// Fields produced by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Street,
    House,
    PostalCode,
    City,
    Building,
    Vehicles,
    Location,
    LocationPlain,
    LocationHtml,
    Subsection,
    PlanNumber,
    Reason,
    Resources,
    UnitList,
    UnitListHtml,
    Remarks,
    IncidentNumber,
    Log,
    Version,
}

impl Field {
    /// Every field, in a stable order.
    pub const ALL: [Field; 19] = [
        Field::Street,
        Field::House,
        Field::PostalCode,
        Field::City,
        Field::Building,
        Field::Vehicles,
        Field::Location,
        Field::LocationPlain,
        Field::LocationHtml,
        Field::Subsection,
        Field::PlanNumber,
        Field::Reason,
        Field::Resources,
        Field::UnitList,
        Field::UnitListHtml,
        Field::Remarks,
        Field::IncidentNumber,
        Field::Log,
        Field::Version,
    ];

    /// Key as expected by the consumer.
    pub fn key(self) -> &'static str {
        match self {
            Field::Street => "street",
            Field::House => "house",
            Field::PostalCode => "postalCode",
            Field::City => "city",
            Field::Building => "building",
            Field::Vehicles => "vehicles",
            Field::Location => "custom_einsatzort",
            Field::LocationPlain => "custom_einsatzort_formatted",
            Field::LocationHtml => "custom_einsatzort_html",
            Field::Subsection => "custom_abschnitt",
            Field::PlanNumber => "custom_plannummer",
            Field::Reason => "custom_einsatzgrund",
            Field::Resources => "custom_einsatzmittel",
            Field::UnitList => "custom_vehicles_alarmtext",
            Field::UnitListHtml => "custom_vehicles_alarmtext_html",
            Field::Remarks => "custom_bemerkung",
            Field::IncidentNumber => "custom_einsatznummer",
            Field::Log => "custom_zerlegung_log",
            Field::Version => "custom_zerlegung_version",
        }
    }

    /// Look up a field by its consumer key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Failure description stored in the log field.
///
/// Meant for an operator reading the alarm, not for machine parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stage that failed.
    pub stage: String,

    /// Failure kind.
    pub kind: String,

    /// Anchor or literal that was not found.
    pub anchor: String,

    /// Human readable message.
    pub message: String,
}

impl From<&ExtractionError> for Diagnostic {
    fn from(err: &ExtractionError) -> Self {
        Self {
            stage: err.stage().to_string(),
            kind: err.kind().to_string(),
            anchor: err.anchor().to_string(),
            message: err.to_string(),
        }
    }
}

impl Diagnostic {
    /// Render as a single JSON line, falling back to the plain message.
    pub fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}
