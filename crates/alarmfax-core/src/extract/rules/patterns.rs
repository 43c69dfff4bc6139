//! Common regex patterns for alarm fax extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Header labels whose `word : value` spacing is collapsed to `word:value`.
pub const HEADER_LABELS: &[(&str, &str)] = &[
    (r"Straße\s*:\s*", "Straße:"),
    (r"Haus-Nr\.\s*:\s*", "Haus-Nr.:"),
    (r"Abschnitt\s*:\s*", "Abschnitt:"),
    (r"Ort\s*:\s*", "Ort:"),
    (r"Objekt\s*:\s*", "Objekt:"),
    (r"Plannummer\s*:\s*", "Plannummer:"),
    (r"Station\s*:\s*", "Station:"),
    (r"Einsatznummer\s*:\s*", "Einsatznummer:"),
];

lazy_static! {
    // Ordered OCR corrections. Later entries rely on the output of earlier ones,
    // e.g. `0rt` must become `Ort` before the header spacing is collapsed.
    pub static ref OCR_SUBSTITUTIONS: Vec<(Regex, &'static str)> = {
        let mut table = vec![
            (Regex::new(r"-+").unwrap(), "-"),
            (Regex::new(r"\s+").unwrap(), " "),
            (Regex::new(r"=").unwrap(), ":"),
            // Happens on the keyword, `#B1012#` is read as `#81012#`
            (Regex::new(r"#8").unwrap(), "#B"),
            (Regex::new(r"(?i)StraBe").unwrap(), "Straße"),
            (Regex::new(r"(?i)0rt").unwrap(), "Ort"),
            (Regex::new(r"(?i)0bjekt").unwrap(), "Objekt"),
            (Regex::new(r"lnfo").unwrap(), "Info"),
        ];
        table.extend(
            HEADER_LABELS
                .iter()
                .map(|(pattern, label)| (Regex::new(pattern).unwrap(), *label)),
        );
        table
    };

    pub static ref DASH_RUN: Regex = Regex::new(r"-+").unwrap();

    // Resources section
    pub static ref RESOURCES_HEADER: Regex = Regex::new(r"^EINSATZMITTEL\s*-*\s*").unwrap();

    pub static ref TRAILING_DASHES: Regex = Regex::new(r"\s*-*\s*$").unwrap();

    pub static ref RESOURCE_DELIMITER: Regex = Regex::new(r"Einsatzmittel\s*:\s*").unwrap();

    // Record index in front of a unit, e.g. `5.1.3 `
    pub static ref RECORD_INDEX: Regex = Regex::new(r"^[\d.\s]*").unwrap();
}
