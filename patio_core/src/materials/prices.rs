//! Lumber Prices
//!
//! Price per linear foot, keyed by nominal catalog label ("2x8", "5/4x6").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::lumber_sizes::LumberSize;

/// Price per linear foot for each catalog label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    prices: BTreeMap<String, f64>,
}

impl PriceTable {
    /// An empty table (every piece costs nothing)
    pub fn empty() -> Self {
        PriceTable {
            prices: BTreeMap::new(),
        }
    }

    /// Price per linear foot for a label, if one is set
    pub fn price_per_foot(&self, label: &str) -> Option<f64> {
        self.prices.get(label).copied()
    }

    /// Set the price per linear foot for a label
    pub fn set_price(&mut self, label: impl Into<String>, price_per_foot: f64) -> CalcResult<()> {
        let label = label.into();
        if !price_per_foot.is_finite() || price_per_foot < 0.0 {
            return Err(CalcError::invalid_input(
                format!("price[{}]", label),
                price_per_foot.to_string(),
                "Price must be a non-negative number",
            ));
        }
        self.prices.insert(label, price_per_foot);
        Ok(())
    }

    /// Iterate over (label, price per foot)
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.prices.iter().map(|(label, price)| (label.as_str(), *price))
    }
}

impl Default for PriceTable {
    /// Typical pressure-treated lumber prices
    fn default() -> Self {
        let prices = [
            (LumberSize::L5_4x6, 1.25),
            (LumberSize::L2x4, 0.60),
            (LumberSize::L2x6, 0.85),
            (LumberSize::L2x8, 1.10),
            (LumberSize::L2x10, 1.45),
            (LumberSize::L2x12, 1.95),
            (LumberSize::L4x4, 1.60),
            (LumberSize::L4x6, 2.40),
            (LumberSize::L6x6, 4.10),
        ];
        PriceTable {
            prices: prices
                .iter()
                .map(|(size, price)| (size.display_name().to_string(), *price))
                .collect(),
        }
    }
}
