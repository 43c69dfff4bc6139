//! Address extraction from the location section.

use tracing::debug;

use crate::error::ExtractionError;
use crate::extract::Result;
use crate::models::alarm::AddressFields;

use super::escape_html;

/// Address fields that are read from a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Street,
    House,
    Subsection,
    City,
    Building,
    PlanNumber,
}

/// A label inside the location section.
struct Label {
    literal: &'static str,
    slot: Option<Slot>,
    required: bool,
}

/// Labels of the location block. Each value runs up to the nearest following
/// label, so optional ones may be missing without shifting the others.
/// Labels without a slot only terminate values.
const LABELS: &[Label] = &[
    Label { literal: "Straße:", slot: Some(Slot::Street), required: true },
    Label { literal: "Haus-Nr.:", slot: Some(Slot::House), required: true },
    Label { literal: "Abschnitt:", slot: Some(Slot::Subsection), required: false },
    Label { literal: "Ort:", slot: Some(Slot::City), required: true },
    Label { literal: "Objekt:", slot: Some(Slot::Building), required: true },
    Label { literal: "Plannummer:", slot: Some(Slot::PlanNumber), required: false },
    Label { literal: "Station:", slot: None, required: false },
    Label { literal: "X:", slot: None, required: false },
];

/// `> Town` in the street field means "towards Town".
const DIRECTION_MARKER: &str = "> ";
const DIRECTION_WORD: &str = "Richtung ";

/// Separator of a duplicated place name, `Baudenbach - Baudenbach`.
const PLACE_SEPARATOR: &str = " - ";

/// Parse the location section into address fields.
pub fn resolve_address(location: &str) -> Result<AddressFields> {
    for label in LABELS.iter().filter(|l| l.required) {
        if !location.contains(label.literal) {
            return Err(ExtractionError::MalformedAddress {
                anchor: label.literal.to_string(),
            });
        }
    }

    let mut street = label_value(location, Slot::Street);
    if let Some(rest) = street.strip_prefix(DIRECTION_MARKER) {
        street = format!("{}{}", DIRECTION_WORD, rest);
    }

    let (postal_code, city) = split_postal_code(&label_value(location, Slot::City));

    let mut address = AddressFields {
        street,
        house: label_value(location, Slot::House),
        subsection: label_value(location, Slot::Subsection),
        postal_code,
        city,
        building: label_value(location, Slot::Building),
        plan_number: label_value(location, Slot::PlanNumber),
        ..Default::default()
    };

    let lines = address.lines();
    address.formatted = lines.join("\n");
    address.formatted_html = lines
        .iter()
        .map(|l| escape_html(l))
        .collect::<Vec<_>>()
        .join("<br>");

    debug!(
        street = %address.street,
        house = %address.house,
        postal_code = %address.postal_code,
        city = %address.city,
        "Resolved address"
    );

    Ok(address)
}

/// Value of the label for `slot`, empty when the label is absent.
fn label_value(location: &str, slot: Slot) -> String {
    let Some(label) = LABELS.iter().find(|l| l.slot == Some(slot)) else {
        return String::new();
    };
    let Some(pos) = location.find(label.literal) else {
        return String::new();
    };

    let start = pos + label.literal.len();
    let end = LABELS
        .iter()
        .filter_map(|l| location[start..].find(l.literal))
        .min()
        .map(|offset| start + offset)
        .unwrap_or(location.len());

    location[start..end].trim().to_string()
}

/// Split the city value into postal code and city name.
///
/// The postal code is every digit of the value. All occurrences of that
/// digit run are then removed from the city, wherever they appear.
fn split_postal_code(value: &str) -> (String, String) {
    let mut city = value;
    if let Some(idx) = city.find(PLACE_SEPARATOR) {
        city = &city[..idx];
    }

    let postal_code: String = city.chars().filter(|c| c.is_ascii_digit()).collect();
    let city = if postal_code.is_empty() {
        city.to_string()
    } else {
        city.replace(&postal_code, "")
    };

    (postal_code, city.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LOCATION: &str = "EINSATZORT - Straße:Teststraße Haus-Nr.:42 Abschnitt:Ort:91460 \
                            Baudenbach - Baudenbach Objekt:Plannummer:Station:FF Baudenbach \
                            X: 0123456 Y: 9876543 - ";

    #[test]
    fn test_resolve_address() {
        let address = resolve_address(LOCATION).unwrap();

        assert_eq!(address.street, "Teststraße");
        assert_eq!(address.house, "42");
        assert_eq!(address.subsection, "");
        assert_eq!(address.postal_code, "91460");
        assert_eq!(address.city, "Baudenbach");
        assert_eq!(address.building, "");
        assert_eq!(address.plan_number, "");
        assert_eq!(address.formatted, "Teststraße 42\n91460 Baudenbach");
        assert_eq!(address.formatted_html, "Teststraße 42<br>91460 Baudenbach");
    }

    #[test]
    fn test_optional_lines() {
        let location = "EINSATZORT Straße:A 6 Haus-Nr.: Abschnitt:AS Ansbach - AS Lehrberg \
                        Ort:Lehrberg Objekt:Rasthof <Süd> & Tankstelle Plannummer:P 12";
        let address = resolve_address(location).unwrap();

        assert_eq!(address.street, "A 6");
        assert_eq!(address.house, "");
        assert_eq!(address.subsection, "AS Ansbach - AS Lehrberg");
        assert_eq!(address.building, "Rasthof <Süd> & Tankstelle");
        assert_eq!(address.plan_number, "P 12");
        assert_eq!(address.postal_code, "");
        assert_eq!(
            address.formatted,
            "A 6\nAS Ansbach - AS Lehrberg\nRasthof <Süd> & Tankstelle\nLehrberg"
        );
        assert_eq!(
            address.formatted_html,
            "A 6<br>AS Ansbach - AS Lehrberg<br>Rasthof &lt;Süd&gt; &amp; Tankstelle<br>Lehrberg"
        );
    }

    #[test]
    fn test_first_line_is_street_and_house() {
        let address = resolve_address(LOCATION).unwrap();
        let first = address.formatted.lines().next().unwrap();

        assert_eq!(first.trim_end(), format!("{} {}", address.street, address.house));
    }

    #[test]
    fn test_direction_street() {
        let location = "Straße:> Ansbach Haus-Nr.: Ort:Baudenbach Objekt:";
        let address = resolve_address(location).unwrap();

        assert_eq!(address.street, "Richtung Ansbach");
    }

    #[test]
    fn test_city_with_duplicate_place() {
        let (postal, city) = split_postal_code("91460 Baudenbach - Musterhausen");

        assert_eq!(postal, "91460");
        assert_eq!(city, "Baudenbach");
    }

    #[test]
    fn test_postal_code_removed_anywhere() {
        // Every digit of the value forms the postal code, so stray digits
        // elsewhere in the city end up in it and nothing is removed.
        let (postal, city) = split_postal_code("91460 Baudenbach 2");
        assert_eq!(postal, "914602");
        assert_eq!(city, "91460 Baudenbach 2");

        // An exact repetition of the digit run is removed at every position.
        let (postal, city) = split_postal_code("Baudenbach 91460");
        assert_eq!(postal, "91460");
        assert_eq!(city, "Baudenbach");
    }

    #[test]
    fn test_missing_required_label() {
        for label in ["Straße:", "Haus-Nr.:", "Ort:", "Objekt:"] {
            let location = LOCATION.replace(label, "");
            let err = resolve_address(&location).unwrap_err();

            assert_eq!(
                err,
                ExtractionError::MalformedAddress {
                    anchor: label.to_string()
                }
            );
        }
    }
}
