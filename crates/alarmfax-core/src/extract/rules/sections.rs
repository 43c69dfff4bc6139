//! Splitting a normalized fax into its top-level sections.

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::alarm::SectionSet;

use super::patterns::DASH_RUN;
use crate::extract::Result;

pub const LOCATION: &str = "EINSATZORT";
pub const DESTINATION: &str = "ZIELORT";
pub const REASON: &str = "EINSATZGRUND";
pub const RESOURCES: &str = "EINSATZMITTEL";
pub const REMARKS: &str = "BEMERKUNG";
pub const END: &str = "ENDE FAX";

/// Split normalized text into location, reason, resources and remarks.
///
/// Fails if any anchor other than `ZIELORT` is missing or the anchors are out
/// of order. Some faxes carry no destination block; the reason anchor then
/// closes the location section.
pub fn segment(text: &str) -> Result<SectionSet> {
    let location = find_anchor(text, LOCATION)?;
    let reason = find_anchor(text, REASON)?;
    let destination = text.find(DESTINATION).unwrap_or(reason);
    let resources = find_anchor(text, RESOURCES)?;
    let remarks = find_anchor(text, REMARKS)?;
    let end = find_anchor(text, END)?;

    debug!(
        location, destination, reason, resources, remarks, end,
        "Located section anchors"
    );

    // Destination must not spill past the reason block
    if destination > reason {
        return Err(malformed(DESTINATION));
    }

    let remarks_text = section(text, remarks, end, END)?;
    let remarks_text = DASH_RUN
        .replace_all(&remarks_text[REMARKS.len()..], " ")
        .trim()
        .to_string();

    Ok(SectionSet {
        location: section(text, location, destination, DESTINATION)?.to_string(),
        reason: section(text, reason, resources, RESOURCES)?.to_string(),
        resources: section(text, resources, remarks, REMARKS)?.to_string(),
        remarks: remarks_text,
    })
}

fn find_anchor(text: &str, anchor: &str) -> Result<usize> {
    text.find(anchor).ok_or_else(|| malformed(anchor))
}

fn section<'a>(text: &'a str, start: usize, end: usize, closing: &str) -> Result<&'a str> {
    if start > end {
        return Err(malformed(closing));
    }
    Ok(&text[start..end])
}

fn malformed(anchor: &str) -> ExtractionError {
    ExtractionError::MalformedDocument {
        anchor: anchor.to_string(),
    }
}
