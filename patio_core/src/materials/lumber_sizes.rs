//! Standard Lumber Sizes
//!
//! The discrete lumber catalog the patio is built from, with
//! nominal-to-actual conversions and per-role catalogs (which sizes the
//! cost search may pick for joists, beam plies, posts and decking).
//!
//! ## Size Conventions
//!
//! A size can be labelled three ways:
//!
//! - **Nominal**: `2x8` (what the lumber yard calls it)
//! - **Actual**: `1 1/2x7 1/4` (what the tape measure reads, inches)
//! - **Metric**: `38x184` (millimeters)
//!
//! ## Multi-Ply Beams
//!
//! Beams are built up from several plies of the same size; a
//! [`BeamDesignation`] such as `2-2x10` names the ply size and count.

use serde::{Deserialize, Serialize};

use crate::units;

/// How catalog sizes are written in labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SizeConvention {
    /// Nominal inches, e.g. "2x8"
    #[default]
    Nominal,
    /// Actual inches with fractions, e.g. "1 1/2x7 1/4"
    Actual,
    /// Actual millimeters, e.g. "38x184"
    Metric,
}

/// Standard lumber size designation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LumberSize {
    /// 5/4x6 decking (1" x 5.5")
    #[serde(rename = "5/4x6")]
    L5_4x6,
    /// 2x4 (1.5" x 3.5")
    #[serde(rename = "2x4")]
    L2x4,
    /// 2x6 (1.5" x 5.5")
    #[serde(rename = "2x6")]
    L2x6,
    /// 2x8 (1.5" x 7.25")
    #[serde(rename = "2x8")]
    L2x8,
    /// 2x10 (1.5" x 9.25")
    #[serde(rename = "2x10")]
    L2x10,
    /// 2x12 (1.5" x 11.25")
    #[serde(rename = "2x12")]
    L2x12,
    /// 4x4 (3.5" x 3.5")
    #[serde(rename = "4x4")]
    L4x4,
    /// 4x6 (3.5" x 5.5")
    #[serde(rename = "4x6")]
    L4x6,
    /// 6x6 (5.5" x 5.5")
    #[serde(rename = "6x6")]
    L6x6,
}

impl LumberSize {
    /// Every size in the catalog
    pub const ALL: [LumberSize; 9] = [
        LumberSize::L5_4x6,
        LumberSize::L2x4,
        LumberSize::L2x6,
        LumberSize::L2x8,
        LumberSize::L2x10,
        LumberSize::L2x12,
        LumberSize::L4x4,
        LumberSize::L4x6,
        LumberSize::L6x6,
    ];

    /// Sizes available for joists
    pub const JOISTS: [LumberSize; 4] = [
        LumberSize::L2x6,
        LumberSize::L2x8,
        LumberSize::L2x10,
        LumberSize::L2x12,
    ];

    /// Sizes available for a single beam ply
    pub const BEAM_PLIES: [LumberSize; 4] = [
        LumberSize::L2x6,
        LumberSize::L2x8,
        LumberSize::L2x10,
        LumberSize::L2x12,
    ];

    /// Sizes available for posts
    pub const POSTS: [LumberSize; 3] = [LumberSize::L4x4, LumberSize::L4x6, LumberSize::L6x6];

    /// Actual (thickness, face) in inches
    pub fn actual_dimensions(&self) -> (f64, f64) {
        match self {
            LumberSize::L5_4x6 => (1.0, 5.5),
            LumberSize::L2x4 => (1.5, 3.5),
            LumberSize::L2x6 => (1.5, 5.5),
            LumberSize::L2x8 => (1.5, 7.25),
            LumberSize::L2x10 => (1.5, 9.25),
            LumberSize::L2x12 => (1.5, 11.25),
            LumberSize::L4x4 => (3.5, 3.5),
            LumberSize::L4x6 => (3.5, 5.5),
            LumberSize::L6x6 => (5.5, 5.5),
        }
    }

    /// Nominal (thickness, face) in inches
    pub fn nominal_dimensions(&self) -> (f64, f64) {
        match self {
            LumberSize::L5_4x6 => (1.25, 6.0),
            LumberSize::L2x4 => (2.0, 4.0),
            LumberSize::L2x6 => (2.0, 6.0),
            LumberSize::L2x8 => (2.0, 8.0),
            LumberSize::L2x10 => (2.0, 10.0),
            LumberSize::L2x12 => (2.0, 12.0),
            LumberSize::L4x4 => (4.0, 4.0),
            LumberSize::L4x6 => (4.0, 6.0),
            LumberSize::L6x6 => (6.0, 6.0),
        }
    }

    /// Get display name (e.g., "2x10")
    pub fn display_name(&self) -> &'static str {
        match self {
            LumberSize::L5_4x6 => "5/4x6",
            LumberSize::L2x4 => "2x4",
            LumberSize::L2x6 => "2x6",
            LumberSize::L2x8 => "2x8",
            LumberSize::L2x10 => "2x10",
            LumberSize::L2x12 => "2x12",
            LumberSize::L4x4 => "4x4",
            LumberSize::L4x6 => "4x6",
            LumberSize::L6x6 => "6x6",
        }
    }

    /// Label in the requested convention
    pub fn label(&self, convention: SizeConvention) -> String {
        let (thickness, face) = self.actual_dimensions();
        section_label(thickness, face, convention)
    }

    /// Actual thickness in inches
    pub fn thickness_in(&self) -> f64 {
        self.actual_dimensions().0
    }

    /// Actual face width in inches
    pub fn face_in(&self) -> f64 {
        self.actual_dimensions().1
    }

    /// Match actual dimensions to a catalog size, in either orientation
    pub fn from_actual_dimensions(a_in: f64, b_in: f64) -> Option<Self> {
        Self::ALL.iter().copied().find(|size| {
            let (t, f) = size.actual_dimensions();
            let same = |x: f64, y: f64| (x - y).abs() < 0.01;
            (same(t, a_in) && same(f, b_in)) || (same(t, b_in) && same(f, a_in))
        })
    }

    /// Parse a nominal label such as "2x10" or "5/4x6"
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace(' ', "");
        Self::ALL.iter().copied().find(|size| size.display_name() == normalized)
    }
}

impl std::fmt::Display for LumberSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Label an arbitrary (thickness, face) section in a size convention.
///
/// Nominal labels fall back to `0` for a side that is not in the lumber
/// table, e.g. a trimmed plank `5/4x0`.
pub fn section_label(thickness_in: f64, face_in: f64, convention: SizeConvention) -> String {
    match convention {
        SizeConvention::Nominal => {
            let side = |actual: f64| units::nominal_label(actual).unwrap_or("0");
            format!("{}x{}", side(thickness_in), side(face_in))
        }
        SizeConvention::Actual => format!(
            "{}x{}",
            units::format_fraction(thickness_in, 16),
            units::format_fraction(face_in, 16)
        ),
        SizeConvention::Metric => {
            let side = |actual: f64| {
                units::metric_from_actual(actual)
                    .unwrap_or_else(|| (actual * units::MM_PER_INCH).round() as u32)
            };
            format!("{}x{}", side(thickness_in), side(face_in))
        }
    }
}

// ============================================================================
// BUILT-UP BEAM DESIGNATION
// ============================================================================

/// Complete beam designation with ply size and ply count
///
/// Represents a built-up beam like "2-2x10" or "3-2x12".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamDesignation {
    /// The lumber size for each ply
    pub size: LumberSize,
    /// Number of plies
    pub plies: u32,
}

impl BeamDesignation {
    /// Create a new beam designation
    pub fn new(size: LumberSize, plies: u32) -> Self {
        Self { size, plies }
    }

    /// Total actual thickness of all plies in inches
    pub fn total_width_in(&self) -> f64 {
        self.size.thickness_in() * self.plies as f64
    }

    /// Get display name (e.g., "2-2x10"; a single ply is just "2x10")
    pub fn display_name(&self) -> String {
        if self.plies > 1 {
            format!("{}-{}", self.plies, self.size.display_name())
        } else {
            self.size.display_name().to_string()
        }
    }
}

impl std::fmt::Display for BeamDesignation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
