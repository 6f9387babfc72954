//! # Bill of Materials
//!
//! Piece counts per catalog label and buying length, and their price.
//!
//! ```text
//! subtotal(label) = Σ count × length_ft × price_per_foot(label)
//! total           = Σ subtotal
//! ```
//!
//! Pieces are grouped by the board they are *bought* as, so a trimmed
//! first decking plank is counted as a full plank.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::components::Component;
use crate::materials::{PriceTable, SizeConvention};
use crate::units::inches_to_feet;

/// A buying length rounded to the nearest 1/16".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LengthKey(u64);

impl LengthKey {
    pub fn from_inches(length_in: f64) -> Self {
        LengthKey((length_in.max(0.0) * 16.0).round() as u64)
    }

    pub fn inches(&self) -> f64 {
        self.0 as f64 / 16.0
    }
}

/// Counts and prices of every board in a generated patio.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BillOfMaterials {
    quantities: BTreeMap<String, BTreeMap<LengthKey, u32>>,
    subtotals: BTreeMap<String, f64>,
    total: f64,
}

impl BillOfMaterials {
    /// Count and price every piece of `components`.
    ///
    /// Labels missing from `prices` are counted but priced at zero.
    pub fn from_components(components: &[Component], prices: &PriceTable) -> Self {
        let mut quantities: BTreeMap<String, BTreeMap<LengthKey, u32>> = BTreeMap::new();
        for piece in components.iter().flat_map(|c| c.pieces()) {
            let label = piece.catalog_label(SizeConvention::Nominal);
            *quantities
                .entry(label)
                .or_default()
                .entry(LengthKey::from_inches(piece.catalog_length()))
                .or_insert(0) += 1;
        }

        let mut subtotals = BTreeMap::new();
        for (label, lengths) in &quantities {
            let price = prices.price_per_foot(label).unwrap_or_else(|| {
                warn!(label = %label, "no price for lumber size, counting it as free");
                0.0
            });
            let feet: f64 = lengths
                .iter()
                .map(|(length, count)| *count as f64 * inches_to_feet(length.inches()))
                .sum();
            subtotals.insert(label.clone(), feet * price);
        }

        let total = subtotals.values().sum();
        BillOfMaterials {
            quantities,
            subtotals,
            total,
        }
    }

    /// Catalog label → buying length → count
    pub fn quantities(&self) -> &BTreeMap<String, BTreeMap<LengthKey, u32>> {
        &self.quantities
    }

    /// Catalog label → price
    pub fn subtotals(&self) -> &BTreeMap<String, f64> {
        &self.subtotals
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of pieces with a label, all lengths together
    pub fn count(&self, label: &str) -> u32 {
        self.quantities.get(label).map(|lengths| lengths.values().sum()).unwrap_or(0)
    }

    /// Total number of pieces
    pub fn piece_count(&self) -> u32 {
        self.quantities.keys().map(|label| self.count(label)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patio::generate;
    use crate::specification::Specification;

    fn default_bill() -> BillOfMaterials {
        let spec = Specification::default();
        BillOfMaterials::from_components(&generate(&spec).unwrap(), spec.prices())
    }

    #[test]
    fn test_default_counts() {
        let bill = default_bill();
        assert_eq!(bill.count("4x4"), 9);
        assert_eq!(bill.count("2x10"), 8);
        assert_eq!(bill.count("2x8"), 36);
        assert_eq!(bill.count("5/4x6"), 38);
        assert_eq!(bill.piece_count(), 91);
        assert_eq!(bill.quantities()["4x4"][&LengthKey::from_inches(53.0)], 9);
        // The outermost span's joists are longer by the cantilever
        assert_eq!(bill.quantities()["2x8"].len(), 2);
    }

    #[test]
    fn test_default_prices() {
        let bill = default_bill();
        let posts = 9.0 * 53.0 / 12.0 * 1.60;
        assert!((bill.subtotals()["4x4"] - posts).abs() < 1e-9);
        let beams = 8.0 * 188.5 / 12.0 * 1.45;
        assert!((bill.subtotals()["2x10"] - beams).abs() < 1e-9);
        let sum: f64 = bill.subtotals().values().sum();
        assert!((bill.total() - sum).abs() < 1e-9);
    }

    #[test]
    fn test_missing_price_is_free() {
        let spec = Specification::default();
        let bill = BillOfMaterials::from_components(&generate(&spec).unwrap(), &PriceTable::empty());
        assert_eq!(bill.total(), 0.0);
        assert_eq!(bill.count("2x8"), 36);
    }

    #[test]
    fn test_length_key_rounds_to_sixteenths() {
        assert_eq!(LengthKey::from_inches(81.583333).inches(), 81.5625);
        assert_eq!(LengthKey::from_inches(53.0).inches(), 53.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let bill = default_bill();
        let json = serde_json::to_string(&bill).unwrap();
        let parsed: BillOfMaterials = serde_json::from_str(&json).unwrap();
        assert_eq!(bill.quantities(), parsed.quantities());
    }
}
