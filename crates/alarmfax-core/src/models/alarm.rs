//! Intermediate results of the extraction stages.

use serde::{Deserialize, Serialize};

/// The four top-level regions of a normalized alarm fax.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSet {
    /// From `EINSATZORT` up to the destination (or reason) block.
    pub location: String,

    /// From `EINSATZGRUND` up to `EINSATZMITTEL`.
    pub reason: String,

    /// From `EINSATZMITTEL` up to `BEMERKUNG`.
    pub resources: String,

    /// Free text between `BEMERKUNG` and `ENDE FAX`, without the header.
    pub remarks: String,
}

/// Address parsed from the location section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub street: String,
    pub house: String,

    /// Road section, e.g. a motorway stretch. Often blank.
    pub subsection: String,

    /// Digits only, or empty.
    pub postal_code: String,
    pub city: String,

    /// Building or object name.
    pub building: String,
    pub plan_number: String,

    /// Multi-line human readable address.
    pub formatted: String,

    /// Same as `formatted`, escaped and joined with `<br>`.
    pub formatted_html: String,
}

impl AddressFields {
    /// Lines of the human readable address, blank optional lines omitted.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{} {}", self.street, self.house).trim().to_string()];

        if !self.subsection.is_empty() {
            lines.push(self.subsection.clone());
        }
        if !self.building.is_empty() {
            lines.push(self.building.clone());
        }

        let place = format!("{} {}", self.postal_code, self.city).trim().to_string();
        if !place.is_empty() {
            lines.push(place);
        }

        lines
    }
}

/// One dispatched unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Unit name, e.g. `FL BAUD 11/1`.
    pub name: String,

    /// Requested equipment, only kept when informative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            equipment: None,
        }
    }

    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.equipment = Some(equipment.into());
        self
    }

    /// Display string, `name (equipment)` when an annotation is present.
    pub fn display(&self) -> String {
        match &self.equipment {
            Some(equipment) => format!("{} ({})", self.name, equipment),
            None => self.name.clone(),
        }
    }
}

/// Everything derived from the resources section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceList {
    /// Allow-listed vehicle ids found in the section, in allow-list order.
    pub vehicles: Vec<String>,

    /// Parsed units, allow-listed vehicles first.
    pub units: Vec<ResourceRecord>,

    /// Unit display strings joined by newlines.
    pub rendered: String,

    /// Unit list as an HTML `<ul>`.
    pub rendered_html: String,
}
