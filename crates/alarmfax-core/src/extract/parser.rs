//! Pipeline controller for ILS alarm faxes.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{AlarmFaxError, ExtractionError};
use crate::models::alarm::{AddressFields, ResourceList, SectionSet};
use crate::models::config::AlarmFaxConfig;
use crate::models::fields::{Diagnostic, Field, FieldMap};

use super::rules::{normalize, resolve_address, segment, ResourceRules};
use super::{AlarmExtractor, Result};

/// Label in front of the incident number.
const INCIDENT_LABEL: &str = "Einsatznummer:";

/// Delimiter that ends the incident number.
const INCIDENT_DELIMITER: &str = " - ";

/// Version marker written into every successful field map.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of a successful extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Top-level sections of the normalized text.
    pub sections: SectionSet,
    /// Parsed address.
    pub address: AddressFields,
    /// Parsed units.
    pub resources: ResourceList,
    /// Incident number as printed on the fax.
    pub incident_number: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Flatten into the field map handed to the alerting system.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = minimal_fields();
        let mut put = |field: Field, value: &str| {
            fields.insert(field.key().to_string(), value.to_string());
        };

        put(Field::Location, &self.sections.location);
        put(Field::Reason, &self.sections.reason);
        put(Field::Resources, &self.sections.resources);
        put(Field::Remarks, &self.sections.remarks);

        put(Field::Street, &self.address.street);
        put(Field::House, &self.address.house);
        put(Field::Subsection, &self.address.subsection);
        put(Field::PostalCode, &self.address.postal_code);
        put(Field::City, &self.address.city);
        put(Field::Building, &self.address.building);
        put(Field::PlanNumber, &self.address.plan_number);
        put(Field::LocationPlain, &self.address.formatted);
        put(Field::LocationHtml, &self.address.formatted_html);

        put(Field::Vehicles, &self.resources.vehicles.join("\n"));
        put(Field::UnitList, &self.resources.rendered);
        put(Field::UnitListHtml, &self.resources.rendered_html);

        put(Field::IncidentNumber, &self.incident_number);

        fields
    }
}

/// Alarm fax parser for the ILS Ansbach layout.
#[derive(Debug, Clone)]
pub struct AlarmFaxParser {
    /// Literal every alarm fax carries.
    signature: String,
    /// Compiled unit rules.
    resources: ResourceRules,
}

impl AlarmFaxParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            signature: crate::models::config::DocumentConfig::default().provider_signature,
            resources: ResourceRules::default(),
        }
    }

    /// Create a parser from configuration, compiling its patterns.
    ///
    /// A blank provider signature is rejected, since every text contains it.
    pub fn from_config(config: &AlarmFaxConfig) -> crate::error::Result<Self> {
        let signature = &config.document.provider_signature;
        if signature.trim().is_empty() {
            return Err(AlarmFaxError::Config(
                "document.provider_signature must not be empty".to_string(),
            ));
        }

        Ok(Self {
            signature: signature.clone(),
            resources: ResourceRules::from_config(&config.resources)?,
        })
    }

    /// Set the provider signature.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Compiled unit rules.
    pub fn resource_rules(&self) -> &ResourceRules {
        &self.resources
    }

    fn extract_incident_number(&self, text: &str) -> Result<String> {
        let start = text
            .find(INCIDENT_LABEL)
            .map(|idx| idx + INCIDENT_LABEL.len())
            .ok_or_else(|| ExtractionError::MalformedIncidentNumber {
                anchor: INCIDENT_LABEL.to_string(),
            })?;

        let rest = &text[start..];
        let end = rest.find(INCIDENT_DELIMITER).unwrap_or(rest.len());

        Ok(rest[..end].trim().to_string())
    }
}

impl Default for AlarmFaxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmExtractor for AlarmFaxParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        if !text.contains(&self.signature) {
            return Err(ExtractionError::NotAnAlarmDocument {
                signature: self.signature.clone(),
            });
        }

        let normalized = normalize(text);
        debug!("Normalized {} characters to {}", text.len(), normalized.len());

        let sections = segment(&normalized)?;
        let address = resolve_address(&sections.location)?;
        let resources = self.resources.resolve(&sections.resources);
        let incident_number = self.extract_incident_number(&normalized)?;

        Ok(ExtractionResult {
            sections,
            address,
            resources,
            incident_number,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn extract(&self, input: Option<&str>) -> FieldMap {
        let text = input.unwrap_or_default();
        if text.trim().is_empty() {
            debug!("Empty input, returning minimal result");
            return minimal_fields();
        }

        info!("Extracting alarm fax from {} characters of text", text.len());

        match self.parse(text) {
            Ok(result) => {
                debug!(
                    "Extracted incident {} with {} units in {}ms",
                    result.incident_number,
                    result.resources.units.len(),
                    result.processing_time_ms
                );
                result.to_fields()
            }
            Err(err) => {
                warn!(stage = err.stage(), "Extraction failed: {}", err);
                let mut fields = FieldMap::new();
                fields.insert(Field::Log.key().to_string(), Diagnostic::from(&err).render());
                fields
            }
        }
    }
}

fn minimal_fields() -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(Field::Version.key().to_string(), VERSION.to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EXAMPLE01: &str = include_str!("../../testdata/example01.txt");

    fn field<'a>(map: &'a FieldMap, field: Field) -> &'a str {
        map.get(field.key()).map(String::as_str).unwrap_or_default()
    }

    fn diagnostic(map: &FieldMap) -> Diagnostic {
        assert_eq!(map.len(), 1, "expected only the diagnostic field: {:?}", map);
        serde_json::from_str(field(map, Field::Log)).unwrap()
    }

    #[test]
    fn test_extract_empty_input() {
        let parser = AlarmFaxParser::new();

        for input in [None, Some(""), Some("  \n ")] {
            let map = parser.extract(input);
            assert_eq!(map.len(), 1);
            assert_eq!(field(&map, Field::Version), VERSION);
            assert!(!map.contains_key(Field::Log.key()));
        }
    }

    #[test]
    fn test_extract_example01() {
        let parser = AlarmFaxParser::new();
        let map = parser.extract(Some(EXAMPLE01));

        assert_eq!(map.len(), Field::ALL.len() - 1);
        assert!(!map.contains_key(Field::Log.key()));

        // Location
        assert_eq!(field(&map, Field::Street), "Teststraße");
        assert_eq!(field(&map, Field::House), "42");
        assert_eq!(field(&map, Field::PostalCode), "91460");
        assert_eq!(field(&map, Field::City), "Baudenbach");
        assert_eq!(field(&map, Field::Building), "");
        assert!(field(&map, Field::Location).contains("X: 0123456 Y: 9876543"));
        assert_eq!(field(&map, Field::LocationPlain), "Teststraße 42\n91460 Baudenbach");
        assert_eq!(field(&map, Field::LocationHtml), "Teststraße 42<br>91460 Baudenbach");

        // Reason
        assert!(field(&map, Field::Reason).contains("B1012"));

        // Resources
        assert!(field(&map, Field::Resources).contains("FL BAUD 11/1"));
        assert!(field(&map, Field::Resources).contains("FL BAUD 42/1"));
        assert_eq!(field(&map, Field::Vehicles), "FL BAUD 11/1\nFL BAUD 42/1");
        assert_eq!(
            field(&map, Field::UnitList),
            "FL BAUD 11/1 (Ex-Warngerät)\n\
             FL BAUD 42/1\n\
             FL NEA-L 100/99 (KBM Mustermann)\n\
             FL FEU 40/1\n\
             FL STG 48/1 (Pressluftatmer [Gerät + Maske])"
        );
        assert!(field(&map, Field::UnitListHtml).starts_with("<ul><li><b style=\"color:red\">"));

        // Remarks and incident
        assert_eq!(field(&map, Field::Remarks), "Beispieltext");
        assert_eq!(field(&map, Field::IncidentNumber), "B 4.1 201107 42");
        assert_eq!(field(&map, Field::Version), VERSION);
    }

    #[test]
    fn test_round_trip_first_line() {
        let result = AlarmFaxParser::new().parse(EXAMPLE01).unwrap();
        let first = result.address.formatted.lines().next().unwrap();

        assert_eq!(
            first.trim_end(),
            format!("{} {}", result.address.street, result.address.house)
        );
    }

    #[test]
    fn test_not_an_alarm_document() {
        let map = AlarmFaxParser::new().extract(Some("Einkaufsliste: Milch, Brot"));
        let diag = diagnostic(&map);

        assert_eq!(diag.kind, "NotAnAlarmDocument");
        assert_eq!(diag.stage, "signature");
        assert_eq!(diag.anchor, "ILS Ansbach");
    }

    #[test]
    fn test_missing_section_anchor() {
        let text = EXAMPLE01.replace("BEMERKUNG", "");
        let diag = diagnostic(&AlarmFaxParser::new().extract(Some(text.as_str())));

        assert_eq!(diag.kind, "MalformedDocument");
        assert_eq!(diag.anchor, "BEMERKUNG");
    }

    #[test]
    fn test_missing_address_label() {
        let text = EXAMPLE01.replace("0bjekt", "Gebäude");
        let diag = diagnostic(&AlarmFaxParser::new().extract(Some(text.as_str())));

        assert_eq!(diag.kind, "MalformedAddress");
        assert_eq!(diag.anchor, "Objekt:");
    }

    #[test]
    fn test_missing_incident_number() {
        let text = EXAMPLE01.replace("Einsatznummer", "Vorgang");
        let diag = diagnostic(&AlarmFaxParser::new().extract(Some(text.as_str())));

        assert_eq!(diag.kind, "MalformedIncidentNumber");
        assert_eq!(diag.stage, "incident_number");
    }

    #[test]
    fn test_missing_destination_block() {
        let text = EXAMPLE01.replace("ZIELORT", "");
        let map = AlarmFaxParser::new().extract(Some(text.as_str()));

        assert_eq!(field(&map, Field::Street), "Teststraße");
        assert!(field(&map, Field::Location).contains("Straße:Haus-Nr.:"));
    }

    #[test]
    fn test_incident_number_until_end() {
        let parser = AlarmFaxParser::new();

        assert_eq!(
            parser.extract_incident_number("x Einsatznummer:B 4.1 1").unwrap(),
            "B 4.1 1"
        );
    }

    #[test]
    fn test_from_config_rejects_blank_signature() {
        let mut config = AlarmFaxConfig::default();

        for signature in ["", "   "] {
            config.document.provider_signature = signature.to_string();
            let err = AlarmFaxParser::from_config(&config).unwrap_err();
            assert!(matches!(err, AlarmFaxError::Config(_)), "got {:?}", err);
        }
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AlarmFaxParser>();
    }

    #[test]
    fn test_custom_signature() {
        let parser = AlarmFaxParser::new().with_signature("ILS Nürnberg");
        let diag = diagnostic(&parser.extract(Some(EXAMPLE01)));

        assert_eq!(diag.anchor, "ILS Nürnberg");
    }

    #[test]
    fn test_from_config() {
        let mut config = AlarmFaxConfig::default();
        config.resources.vehicles = vec!["FL STG 48/1".to_string(), "FL BAUD 42/1".to_string()];
        let parser = AlarmFaxParser::from_config(&config).unwrap();
        assert_eq!(parser.resource_rules().vehicles(), config.resources.vehicles.as_slice());

        let map = parser.extract(Some(EXAMPLE01));

        assert_eq!(field(&map, Field::Vehicles), "FL STG 48/1\nFL BAUD 42/1");
        assert!(field(&map, Field::UnitList).starts_with(
            "FL STG 48/1 (Pressluftatmer [Gerät + Maske])\nFL BAUD 42/1\nFL BAUD 11/1 (Ex-Warngerät)"
        ));
    }
}
