//! # patio_core - Parametric Patio Framing Engine
//!
//! `patio_core` turns a handful of design parameters (overall size, lumber
//! sizes, spacings, ply and post counts) into every board of a patio frame,
//! prices it, checks it against a fixed set of code tables, and searches the
//! lumber catalog for the cheapest compliant variation.
//!
//! ## Design Philosophy
//!
//! - **One source of truth**: the [`Specification`]; everything else is
//!   regenerated from it
//! - **JSON-First**: specifications, components, bills and violations all
//!   implement Serialize/Deserialize
//! - **Two error channels**: code-compliance problems are [`Violation`]s,
//!   degenerate inputs are [`CalcError`]s
//! - **Single-threaded**: no background work, no I/O in the core
//!
//! ## Quick Start
//!
//! ```rust
//! use patio_core::{Patio, Specification};
//!
//! let patio = Patio::new(Specification::default()).unwrap();
//! assert!(patio.violations().is_empty());
//! assert_eq!(patio.beams().count(), 4);
//! println!("Total: ${:.2}", patio.bill().total());
//! ```
//!
//! ## Modules
//!
//! - [`specification`] - Design parameters and cascading updates
//! - [`components`] - Pieces, structural groups and the generators
//! - [`validator`] / [`code_tables`] - Code-compliance checks
//! - [`bill`] - Piece counts and prices
//! - [`patio`] - Generation cycle, listeners, snapshots
//! - [`optimizer`] - Cheapest compliant configuration
//! - [`materials`] - Lumber catalog and prices
//! - [`geometry`] / [`units`] - Vectors, lengths and lumber size tables
//! - [`errors`] - Structured error types

pub mod bill;
pub mod code_tables;
pub mod components;
pub mod errors;
pub mod geometry;
pub mod materials;
pub mod optimizer;
pub mod patio;
pub mod snapshot;
pub mod specification;
pub mod units;
pub mod validator;

// Re-export commonly used types at crate root for convenience
pub use bill::BillOfMaterials;
pub use components::{Component, Piece, StructuralGroup, StructuralRole};
pub use errors::{CalcError, CalcResult};
pub use geometry::{Dimension, Position};
pub use patio::{Patio, PatioListener};
pub use snapshot::SpecSnapshot;
pub use specification::{Cascade, Change, Specification};
pub use validator::Violation;
