//! Address extraction from a subject's deal history.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::deals::Deal;

/// Number of most recent deals scanned for plottable addresses.
pub const RECENT_DEALS_CAP: usize = 10;

/// A deduplicated property address together with the date of the first deal
/// that mentioned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
    pub address: String,
    pub associated_date: String,
}

impl AddressEntry {
    #[must_use]
    pub fn new(address: impl Into<String>, associated_date: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            associated_date: associated_date.into(),
        }
    }
}

/// Collects unique addresses from the first `cap` deals.
///
/// The cap bounds how many deals are scanned, not how many addresses are
/// returned, so ten deals at two buildings yield two entries. Deals with a
/// missing or blank address are skipped. Duplicates are matched on the exact
/// address string and keep the date of their first occurrence; output order
/// is order of first appearance.
#[must_use]
pub fn extract_addresses(deals: &[Deal], cap: usize) -> Vec<AddressEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();

    for deal in deals.iter().take(cap) {
        let Some(address) = deal.property_address.as_deref() else {
            continue;
        };
        if address.trim().is_empty() {
            continue;
        }
        if seen.insert(address) {
            entries.push(AddressEntry::new(address, deal.date.clone()));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(id: i64, address: Option<&str>, date: &str) -> Deal {
        Deal {
            id,
            property: format!("Property {id}"),
            property_address: address.map(str::to_owned),
            date: date.to_owned(),
            role: None,
            url: format!("/deals/{id}"),
            deal_type: None,
        }
    }

    #[test]
    fn keeps_first_occurrence_and_order() {
        let deals = vec![
            deal(1, Some("10 Main St"), "2024-05-01"),
            deal(2, Some("22 Oak Ave"), "2024-04-01"),
            deal(3, Some("10 Main St"), "2024-03-01"),
        ];
        let entries = extract_addresses(&deals, RECENT_DEALS_CAP);
        assert_eq!(
            entries,
            vec![
                AddressEntry::new("10 Main St", "2024-05-01"),
                AddressEntry::new("22 Oak Ave", "2024-04-01"),
            ]
        );
    }

    #[test]
    fn skips_missing_and_blank_addresses() {
        let deals = vec![
            deal(1, None, "2024-05-01"),
            deal(2, Some(""), "2024-04-01"),
            deal(3, Some("   "), "2024-03-01"),
            deal(4, Some("5 Pier Rd"), "2024-02-01"),
        ];
        let entries = extract_addresses(&deals, RECENT_DEALS_CAP);
        assert_eq!(entries, vec![AddressEntry::new("5 Pier Rd", "2024-02-01")]);
    }

    #[test]
    fn cap_applies_to_deals_scanned() {
        // Deals 0..9 all share one address; the 11th has a new one that must
        // stay out of range even though only one unique address was found.
        let mut deals: Vec<Deal> = (0..10)
            .map(|i| deal(i, Some("1 Same Pl"), "2024-01-01"))
            .collect();
        deals.push(deal(10, Some("2 Other Pl"), "2023-12-01"));

        let entries = extract_addresses(&deals, 10);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].address, "1 Same Pl");
    }

    #[test]
    fn exact_match_only() {
        let deals = vec![
            deal(1, Some("10 Main St"), "2024-05-01"),
            deal(2, Some("10 main st"), "2024-04-01"),
        ];
        assert_eq!(extract_addresses(&deals, RECENT_DEALS_CAP).len(), 2);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(extract_addresses(&[], RECENT_DEALS_CAP).is_empty());
    }
}
