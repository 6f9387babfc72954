//! # Materials
//!
//! The lumber catalog and its prices.
//!
//! ## Example
//!
//! ```rust
//! use patio_core::materials::{LumberSize, PriceTable, SizeConvention};
//!
//! let prices = PriceTable::default();
//! let joist = LumberSize::L2x8;
//! assert_eq!(joist.label(SizeConvention::Metric), "38x184");
//! assert!(prices.price_per_foot(joist.display_name()).is_some());
//! ```

pub mod lumber_sizes;
pub mod prices;

pub use lumber_sizes::{section_label, BeamDesignation, LumberSize, SizeConvention};
pub use prices::PriceTable;
