//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Main configuration for the alarmfax pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmFaxConfig {
    /// Document recognition configuration.
    pub document: DocumentConfig,

    /// Dispatched unit handling.
    pub resources: ResourceConfig,
}

/// Document recognition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Literal that must appear in the raw text of every alarm fax.
    pub provider_signature: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            provider_signature: "ILS Ansbach".to_string(),
        }
    }
}

/// Dispatched unit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Vehicles the alerting app knows by exact name. Order is the sort order.
    pub vehicles: Vec<String>,

    /// Our own default unit, which is always alerted and never listed.
    pub own_unit: String,

    /// Units whose name contains this marker are information-only alerts.
    pub info_alarm_marker: String,

    /// Regexes for unit names that are dropped from the roster.
    pub excluded_unit_patterns: Vec<String>,

    /// Regexes for equipment annotations that carry no information.
    pub boilerplate_equipment: Vec<String>,

    /// Equipment annotations up to this many characters are suppressed.
    pub min_equipment_len: usize,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            vehicles: vec![
                "FL BAUD 11/1".to_string(),
                "FL BAUD 42/1".to_string(),
                "FL BAUD 49/1".to_string(),
            ],
            own_unit: "NEA FF Baudenbach".to_string(),
            info_alarm_marker: "Infoalarm".to_string(),
            excluded_unit_patterns: vec![r"NEA-L.*Abschnitt".to_string()],
            boilerplate_equipment: vec![r"^Sonderausrüstung KB\w$".to_string()],
            min_equipment_len: 3,
        }
    }
}

impl AlarmFaxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
