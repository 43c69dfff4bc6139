//! Dispatched unit (resource) extraction.
//!
//! The alerting app only acts on vehicles it knows by exact name, so those are
//! reported separately. The full roster is still parsed for display.

use regex::Regex;
use tracing::{debug, trace};

use crate::error::Result;
use crate::models::alarm::{ResourceList, ResourceRecord};
use crate::models::config::ResourceConfig;

use super::escape_html;
use super::patterns::{RECORD_INDEX, RESOURCES_HEADER, RESOURCE_DELIMITER, TRAILING_DASHES};

/// Word that ends the unit name inside a record.
const ALERTED: &str = "Alarmiert";

/// Markup around allow-listed vehicles in the HTML list.
const EMPHASIS_OPEN: &str = "<b style=\"color:red\">";
const EMPHASIS_CLOSE: &str = "</b>";

/// Compiled resource rules.
///
/// Built once from [`ResourceConfig`] and only read afterwards.
#[derive(Debug, Clone)]
pub struct ResourceRules {
    vehicles: Vec<String>,
    own_unit: String,
    info_alarm_marker: String,
    excluded_units: Vec<Regex>,
    boilerplate_equipment: Vec<Regex>,
    min_equipment_len: usize,
}

impl ResourceRules {
    /// Compile the rules, failing on an invalid pattern.
    pub fn from_config(config: &ResourceConfig) -> Result<Self> {
        let excluded_units = config
            .excluded_unit_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let boilerplate_equipment = config
            .boilerplate_equipment
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            vehicles: config
                .vehicles
                .iter()
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .collect(),
            own_unit: config.own_unit.clone(),
            info_alarm_marker: config.info_alarm_marker.clone(),
            excluded_units,
            boilerplate_equipment,
            min_equipment_len: config.min_equipment_len,
        })
    }

    /// Allow-listed vehicles, in sort order.
    pub fn vehicles(&self) -> &[String] {
        &self.vehicles
    }

    /// Resolve the resources section. Never fails; no matches give empty output.
    pub fn resolve(&self, section: &str) -> ResourceList {
        let vehicles = self.known_vehicles(section);
        let units = self.sort_units(self.parse_units(section));

        let rendered = units
            .iter()
            .map(ResourceRecord::display)
            .collect::<Vec<_>>()
            .join("\n");
        let rendered_html = self.render_html(&units);

        debug!(
            "Resolved {} known vehicles and {} units",
            vehicles.len(),
            units.len()
        );

        ResourceList {
            vehicles,
            units,
            rendered,
            rendered_html,
        }
    }

    /// Every allow-listed vehicle that occurs anywhere in the section.
    pub fn known_vehicles(&self, section: &str) -> Vec<String> {
        self.vehicles
            .iter()
            .filter(|v| section.contains(v.as_str()))
            .cloned()
            .collect()
    }

    /// Parse one record per `Einsatzmittel:` delimiter, in document order.
    pub fn parse_units(&self, section: &str) -> Vec<ResourceRecord> {
        let cleaned = RESOURCES_HEADER.replace(section, "");
        let cleaned = TRAILING_DASHES.replace(&cleaned, "");

        RESOURCE_DELIMITER
            .split(&cleaned)
            .filter(|fragment| !fragment.is_empty())
            .filter_map(|fragment| self.parse_fragment(fragment))
            .collect()
    }

    /// Parse a single record such as
    /// `5.1.3 FL BAUD 11/1 Alarmiert : 07.11.2020 15:11:54 Geforderte Ausstattung : Ex-Warngerät`.
    fn parse_fragment(&self, fragment: &str) -> Option<ResourceRecord> {
        let stripped = RECORD_INDEX.replace(fragment, "");
        let fragment = stripped.as_ref();

        let name = match fragment.find(ALERTED) {
            Some(idx) => &fragment[..idx],
            None => fragment,
        }
        .trim();
        let mut equipment = fragment
            .rfind(':')
            .map(|idx| fragment[idx + 1..].trim())
            .unwrap_or("");

        if self.is_excluded(name) {
            trace!(name, "Skipping unit");
            return None;
        }

        if self.boilerplate_equipment.iter().any(|p| p.is_match(equipment)) {
            equipment = "";
        }

        let record = ResourceRecord::new(name);
        if equipment.chars().count() > self.min_equipment_len {
            Some(record.with_equipment(equipment))
        } else {
            Some(record)
        }
    }

    fn is_excluded(&self, name: &str) -> bool {
        name.is_empty()
            || (!self.info_alarm_marker.is_empty() && name.contains(&self.info_alarm_marker))
            || name == self.own_unit
            || self.excluded_units.iter().any(|p| p.is_match(name))
    }

    /// Move allow-listed vehicles to the front, in allow-list order.
    ///
    /// Each vehicle takes the first remaining unit mentioning it; the rest keep
    /// their document order.
    pub fn sort_units(&self, units: Vec<ResourceRecord>) -> Vec<ResourceRecord> {
        let mut pool = units;
        let mut sorted = Vec::with_capacity(pool.len());

        for vehicle in &self.vehicles {
            if let Some(idx) = pool
                .iter()
                .position(|u| u.display().contains(vehicle.as_str()))
            {
                sorted.push(pool.remove(idx));
            }
        }

        sorted.extend(pool);
        sorted
    }

    /// Whether a display string mentions an allow-listed vehicle.
    pub fn is_known(&self, display: &str) -> bool {
        self.vehicles.iter().any(|v| display.contains(v.as_str()))
    }

    /// Render units as an HTML list, emphasizing allow-listed vehicles.
    pub fn render_html(&self, units: &[ResourceRecord]) -> String {
        if units.is_empty() {
            return String::new();
        }

        let mut html = String::from("<ul>");
        for unit in units {
            let display = unit.display();
            let text = escape_html(&display);
            html.push_str("<li>");
            if self.is_known(&display) {
                html.push_str(EMPHASIS_OPEN);
                html.push_str(&text);
                html.push_str(EMPHASIS_CLOSE);
            } else {
                html.push_str(&text);
            }
            html.push_str("</li>");
        }
        html.push_str("</ul>");
        html
    }
}

impl Default for ResourceRules {
    fn default() -> Self {
        Self::from_config(&ResourceConfig::default()).expect("default resource patterns compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SECTION: &str = "EINSATZMITTEL - Einsatzmittel : 5.1.3 FL BAUD 42/1 Alarmiert : \
        07.11.2020 15:11:54 Geforderte Ausstattung : Einsatzmittel : 5.1.3 FL BAUD 11/1 \
        Alarmiert : 07.11.2020 15:11:54 Geforderte Ausstattung : Ex-Warngerät Einsatzmittel : \
        5.1.3 NEA FF Baudenbach Alarmiert : 07.11.2020 15:11:54 Geforderte Ausstattung : \
        Einsatzmittel : 5.1.3 FL NEA-L 100/99 Alarmiert : 07.11.2020 15:11:55 Geforderte \
        Ausstattung : KBM Mustermann Einsatzmittel : 5.1.3 NEA FF NEA-L K42 Abschnitt XYZ \
        Alarmiert : 07.11.2020 15:11:55 Geforderte Ausstattung : Einsatzmittel : 5.1.3 \
        Infoalarm KBI Landkreis Alarmiert : 07.11.2020 15:11:55 Geforderte Ausstattung : \
        Einsatzmittel : 5.1.3 FL FEU 40/1 Alarmiert : 07.11.2020 15:11:56 Geforderte \
        Ausstattung : Sonderausrüstung KBA Einsatzmittel : 5.1.3 FL STG 48/1 Alarmiert : \
        07.11.2020 15:11:56 Geforderte Ausstattung : Pressluftatmer [Gerät + Maske] - ";

    #[test]
    fn test_known_vehicles_in_allow_list_order() {
        let rules = ResourceRules::default();

        assert_eq!(
            rules.known_vehicles(SECTION),
            vec!["FL BAUD 11/1", "FL BAUD 42/1"]
        );
    }

    #[test]
    fn test_parse_units_in_document_order() {
        let rules = ResourceRules::default();
        let units = rules.parse_units(SECTION);

        assert_eq!(
            units,
            vec![
                ResourceRecord::new("FL BAUD 42/1"),
                ResourceRecord::new("FL BAUD 11/1").with_equipment("Ex-Warngerät"),
                ResourceRecord::new("FL NEA-L 100/99").with_equipment("KBM Mustermann"),
                ResourceRecord::new("FL FEU 40/1"),
                ResourceRecord::new("FL STG 48/1").with_equipment("Pressluftatmer [Gerät + Maske]"),
            ]
        );
    }

    #[test]
    fn test_resolve_sorted_and_rendered() {
        let rules = ResourceRules::default();
        let list = rules.resolve(SECTION);

        assert_eq!(
            list.rendered,
            "FL BAUD 11/1 (Ex-Warngerät)\n\
             FL BAUD 42/1\n\
             FL NEA-L 100/99 (KBM Mustermann)\n\
             FL FEU 40/1\n\
             FL STG 48/1 (Pressluftatmer [Gerät + Maske])"
        );
        assert_eq!(
            list.rendered_html,
            "<ul>\
             <li><b style=\"color:red\">FL BAUD 11/1 (Ex-Warngerät)</b></li>\
             <li><b style=\"color:red\">FL BAUD 42/1</b></li>\
             <li>FL NEA-L 100/99 (KBM Mustermann)</li>\
             <li>FL FEU 40/1</li>\
             <li>FL STG 48/1 (Pressluftatmer [Gerät + Maske])</li>\
             </ul>"
        );
    }

    #[test]
    fn test_own_unit_excluded() {
        let rules = ResourceRules::default();
        let units = rules.parse_units(
            "Einsatzmittel : NEA FF Baudenbach Alarmiert : 07.11.2020 15:11:54 Geforderte Ausstattung :",
        );

        assert!(units.is_empty());
    }

    #[test]
    fn test_short_equipment_suppressed() {
        let rules = ResourceRules::default();
        let units = rules.parse_units(
            "Einsatzmittel : 1.2 FL ABC 1/1 Alarmiert : 15:11:54 Geforderte Ausstattung : KTW",
        );

        assert_eq!(units, vec![ResourceRecord::new("FL ABC 1/1")]);
    }

    #[test]
    fn test_fragment_without_alerted_word() {
        let rules = ResourceRules::default();
        let units = rules.parse_units("Einsatzmittel : 5.1 RTW Ansbach 71/1");

        assert_eq!(units, vec![ResourceRecord::new("RTW Ansbach 71/1")]);
    }

    #[test]
    fn test_sort_takes_first_match_per_vehicle() {
        let rules = ResourceRules::default();
        let units = vec![
            ResourceRecord::new("RTW 1"),
            ResourceRecord::new("FL BAUD 42/1"),
            ResourceRecord::new("FL BAUD 11/1").with_equipment("A"),
            ResourceRecord::new("FL BAUD 11/1").with_equipment("B"),
        ];

        let sorted: Vec<_> = rules
            .sort_units(units)
            .iter()
            .map(ResourceRecord::display)
            .collect();
        assert_eq!(
            sorted,
            vec!["FL BAUD 11/1 (A)", "FL BAUD 42/1", "RTW 1", "FL BAUD 11/1 (B)"]
        );
    }

    #[test]
    fn test_custom_allow_list() {
        let config = ResourceConfig {
            vehicles: vec!["FL STG 48/1".to_string(), String::new()],
            ..Default::default()
        };
        let rules = ResourceRules::from_config(&config).unwrap();
        let list = rules.resolve(SECTION);

        assert_eq!(list.vehicles, vec!["FL STG 48/1"]);
        assert_eq!(list.units[0].name, "FL STG 48/1");
        assert!(!list.rendered_html.contains("<b style=\"color:red\">FL BAUD"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = ResourceConfig {
            excluded_unit_patterns: vec!["(".to_string()],
            ..Default::default()
        };

        assert!(ResourceRules::from_config(&config).is_err());
    }

    #[test]
    fn test_empty_section() {
        let list = ResourceRules::default().resolve("EINSATZMITTEL - ");

        assert_eq!(list, ResourceList::default());
    }
}
