//! Map markers for resolved deal addresses.

use brokermap_core::{AddressEntry, Coordinates};
use serde::Serialize;

const RED_MARKER_ICON_URL: &str =
    "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img/marker-icon-2x-red.png";
const MARKER_SHADOW_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/0.7.7/images/marker-shadow.png";

/// Point marker icon, in the pixel geometry Leaflet-style libraries expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub icon_url: String,
    pub shadow_url: String,
    pub icon_size: (u32, u32),
    pub icon_anchor: (i32, i32),
    pub popup_anchor: (i32, i32),
    pub shadow_size: (u32, u32),
}

impl MarkerIcon {
    /// The red pin used for a broker's recent deal locations.
    #[must_use]
    pub fn red() -> Self {
        Self {
            icon_url: RED_MARKER_ICON_URL.to_owned(),
            shadow_url: MARKER_SHADOW_URL.to_owned(),
            icon_size: (25, 41),
            icon_anchor: (12, 41),
            popup_anchor: (1, -34),
            shadow_size: (41, 41),
        }
    }
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self::red()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerRecord {
    /// Position of the source entry in the extracted address list.
    pub ordinal: usize,
    pub coordinates: Coordinates,
    pub address: String,
    pub date: String,
    pub label: String,
}

impl MarkerRecord {
    #[must_use]
    pub fn new(ordinal: usize, entry: &AddressEntry, coordinates: Coordinates) -> Self {
        Self {
            ordinal,
            coordinates,
            address: entry.address.clone(),
            date: entry.associated_date.clone(),
            label: marker_label(&entry.address, &entry.associated_date),
        }
    }
}

/// `"{address} ({date})"`, or just the address when the date is blank.
#[must_use]
pub fn marker_label(address: &str, date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        address.to_owned()
    } else {
        format!("{address} ({date})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_includes_date() {
        assert_eq!(
            marker_label("1 Vanderbilt Ave", "2024-03-01"),
            "1 Vanderbilt Ave (2024-03-01)"
        );
    }

    #[test]
    fn label_without_date_is_just_address() {
        assert_eq!(marker_label("1 Vanderbilt Ave", "  "), "1 Vanderbilt Ave");
    }

    #[test]
    fn marker_copies_entry_fields() {
        let entry = AddressEntry::new("22 Oak Ave", "2023-07-15");
        let marker = MarkerRecord::new(3, &entry, Coordinates::new(41.0, -76.0));
        assert_eq!(marker.ordinal, 3);
        assert_eq!(marker.address, "22 Oak Ave");
        assert_eq!(marker.date, "2023-07-15");
        assert_eq!(marker.label, "22 Oak Ave (2023-07-15)");
    }
}
