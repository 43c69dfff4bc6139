//! OCR noise normalization.

use regex::NoExpand;

use super::patterns::OCR_SUBSTITUTIONS;

/// Apply the fixed OCR substitution table to the raw fax text.
///
/// Collapses dash and whitespace runs, repairs recurring misreads and
/// harmonizes header labels to `Label:` so later stages can search for exact
/// literals. One pass is enough: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let mut result = text.to_string();
    for (pattern, replacement) in OCR_SUBSTITUTIONS.iter() {
        result = pattern
            .replace_all(&result, NoExpand(replacement))
            .into_owned();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapse_dashes_and_whitespace() {
        assert_eq!(
            normalize("------ EINSATZORT -----\n\n  StraBe"),
            "- EINSATZORT - Straße"
        );
    }

    #[test]
    fn test_ocr_misreads() {
        assert_eq!(normalize("X= 0123456"), "X: 0123456");
        assert_eq!(normalize("#81012#Brand"), "#B1012#Brand");
        assert_eq!(normalize("STRABE 0RT 0bjekt lnfoalarm"), "Straße Ort Objekt Infoalarm");
    }

    #[test]
    fn test_header_spacing() {
        assert_eq!(
            normalize("StraBe   :  Teststraße   Haus-Nr. :  42\n0rt= 91460 Baudenbach"),
            "Straße:Teststraße Haus-Nr.:42 Ort:91460 Baudenbach"
        );
        assert_eq!(normalize("Abschnitt :\n0bjekt :"), "Abschnitt:Objekt:");
        assert_eq!(normalize("Einsatznummer : B 4.1"), "Einsatznummer:B 4.1");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "--==--",
            "StraBe : > 0rt  Haus-Nr. = 1 - - Objekt  :  Plannummer:",
            "Ort : Straße : x",
            include_str!("../../../testdata/example01.txt"),
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
