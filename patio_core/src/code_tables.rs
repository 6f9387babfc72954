//! # Code Tables
//!
//! Fixed lookup tables standing in for the regional building code. Each
//! lookup returns either a bound or "no entry"; callers turn a missing entry
//! into a dimension-class violation rather than a bound violation.
//!
//! ## Tables
//!
//! | Table                         | Keyed by                              |
//! |-------------------------------|---------------------------------------|
//! | Post max height               | post size                             |
//! | Joist allowable span          | joist size, joist spacing bucket      |
//! | Joist max cantilever          | joist size, joist spacing bucket      |
//! | Covering max joist spacing    | plank size                            |
//! | Beam requirement              | post spacing bucket, tributary bucket |
//!
//! Buckets are upper bounds: a value falls in the first bucket that is at
//! least as large as it.

use serde::{Deserialize, Serialize};

use crate::materials::LumberSize;
use crate::specification::EPSILON;

// ============================================================================
// Buckets
// ============================================================================

/// Joist spacing buckets (on center, inches)
pub const JOIST_SPACING_BUCKETS: [f64; 3] = [12.0, 16.0, 24.0];

/// Post spacing buckets for the beam table (inches)
pub const POST_SPACING_BUCKETS: [f64; 5] = [48.0, 72.0, 96.0, 120.0, 144.0];

/// Tributary length buckets for the beam table (inches)
pub const TRIBUTARY_BUCKETS: [f64; 7] = [48.0, 72.0, 96.0, 120.0, 144.0, 168.0, 192.0];

fn bucket(buckets: &[f64], value: f64) -> Option<usize> {
    buckets.iter().position(|upper| value <= upper + EPSILON)
}

/// Index of the joist spacing bucket, or `None` past 24" on center
pub fn joist_spacing_bucket(spacing: f64) -> Option<usize> {
    bucket(&JOIST_SPACING_BUCKETS, spacing)
}

// ============================================================================
// Posts, joists, decking
// ============================================================================

/// Tallest post allowed for a post section
pub fn max_post_height(post: LumberSize) -> Option<f64> {
    match post {
        LumberSize::L4x4 | LumberSize::L4x6 => Some(96.0),
        LumberSize::L6x6 => Some(168.0),
        _ => None,
    }
}

fn joist_row(joist: LumberSize) -> Option<([f64; 3], [f64; 3])> {
    // (allowable span, max cantilever) per spacing bucket
    match joist {
        LumberSize::L2x6 => Some(([119.0, 108.0, 91.0], [16.0, 14.0, 11.0])),
        LumberSize::L2x8 => Some(([157.0, 142.0, 116.0], [24.0, 21.0, 17.0])),
        LumberSize::L2x10 => Some(([194.0, 168.0, 137.0], [31.0, 26.0, 21.0])),
        LumberSize::L2x12 => Some(([216.0, 198.0, 162.0], [36.0, 32.0, 26.0])),
        _ => None,
    }
}

/// Longest span allowed between beams for a joist at a spacing
pub fn joist_allowable_span(joist: LumberSize, spacing: f64) -> Option<f64> {
    let (spans, _) = joist_row(joist)?;
    Some(spans[joist_spacing_bucket(spacing)?])
}

/// Longest overhang past the outermost beam for a joist at a spacing
pub fn joist_max_cantilever(joist: LumberSize, spacing: f64) -> Option<f64> {
    let (_, cantilevers) = joist_row(joist)?;
    Some(cantilevers[joist_spacing_bucket(spacing)?])
}

/// Widest joist spacing a decking plank may bridge
pub fn covering_max_joist_spacing(plank: LumberSize) -> Option<f64> {
    match plank {
        LumberSize::L5_4x6 => Some(16.0),
        LumberSize::L2x4 | LumberSize::L2x6 => Some(24.0),
        _ => None,
    }
}

// ============================================================================
// Beams
// ============================================================================

/// A built-up beam in nominal terms: `plies` boards of `thickness` × `face`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamCombination {
    pub plies: u32,
    pub thickness: f64,
    pub face: f64,
}

impl BeamCombination {
    const fn two_by(plies: u32, face: f64) -> Self {
        BeamCombination {
            plies,
            thickness: 2.0,
            face,
        }
    }

    /// Section (nominal thickness and face) at least as large as required
    pub fn section_fits(&self, thickness: f64, face: f64) -> bool {
        thickness + EPSILON >= self.thickness && face + EPSILON >= self.face
    }

    /// Plies, thickness and face all at least as large as required
    pub fn is_met_by(&self, plies: u32, thickness: f64, face: f64) -> bool {
        plies >= self.plies && self.section_fits(thickness, face)
    }
}

/// Minimum beam for a post spacing and tributary length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamRequirement {
    pub primary: BeamCombination,
    /// A thinner section that passes with more plies
    pub alternate: Option<BeamCombination>,
}

impl BeamRequirement {
    /// Primary, then alternate if present
    pub fn branches(&self) -> impl Iterator<Item = BeamCombination> {
        std::iter::once(self.primary).chain(self.alternate)
    }

    /// Either branch met in full
    pub fn is_met_by(&self, plies: u32, thickness: f64, face: f64) -> bool {
        self.branches().any(|branch| branch.is_met_by(plies, thickness, face))
    }
}

/// Result of a beam table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BeamLookup {
    Found(BeamRequirement),
    /// Posts further apart than the table goes
    PostSpacingOutOfRange,
    /// No beam in the table carries this tributary length at this spacing
    NoCombination,
}

const fn r(plies: u32, face: f64) -> Option<BeamRequirement> {
    Some(BeamRequirement {
        primary: BeamCombination::two_by(plies, face),
        alternate: None,
    })
}

const fn a(plies: u32, face: f64, alt_plies: u32, alt_face: f64) -> Option<BeamRequirement> {
    Some(BeamRequirement {
        primary: BeamCombination::two_by(plies, face),
        alternate: Some(BeamCombination::two_by(alt_plies, alt_face)),
    })
}

/// Rows: post spacing bucket. Columns: tributary bucket.
const BEAM_TABLE: [[Option<BeamRequirement>; 7]; 5] = [
    [r(1, 6.0), r(1, 6.0), r(1, 8.0), r(2, 6.0), r(2, 6.0), r(2, 8.0), r(2, 8.0)],
    [
        r(1, 8.0),
        r(2, 6.0),
        r(2, 8.0),
        r(2, 8.0),
        a(2, 10.0, 3, 8.0),
        a(2, 10.0, 3, 8.0),
        a(2, 10.0, 3, 8.0),
    ],
    [
        r(2, 6.0),
        r(2, 8.0),
        a(2, 10.0, 3, 8.0),
        a(2, 10.0, 3, 8.0),
        a(2, 12.0, 3, 10.0),
        a(2, 12.0, 3, 10.0),
        r(3, 12.0),
    ],
    [
        r(2, 8.0),
        a(2, 10.0, 3, 8.0),
        a(2, 12.0, 3, 10.0),
        a(2, 12.0, 3, 10.0),
        r(3, 12.0),
        r(3, 12.0),
        None,
    ],
    [a(2, 10.0, 3, 8.0), a(2, 12.0, 3, 10.0), r(3, 12.0), r(3, 12.0), None, None, None],
];

/// Minimum beam for posts `post_spacing` apart carrying `tributary` inches
/// of joists.
pub fn beam_requirement(post_spacing: f64, tributary: f64) -> BeamLookup {
    let Some(row) = bucket(&POST_SPACING_BUCKETS, post_spacing) else {
        return BeamLookup::PostSpacingOutOfRange;
    };
    match bucket(&TRIBUTARY_BUCKETS, tributary).and_then(|column| BEAM_TABLE[row][column]) {
        Some(requirement) => BeamLookup::Found(requirement),
        None => BeamLookup::NoCombination,
    }
}

/// Longest overhang of a beam past its end post, as a fraction of the
/// longest stretch between its posts
pub const MAX_BEAM_OVERHANG_RATIO: f64 = 0.25;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_buckets() {
        assert_eq!(joist_spacing_bucket(8.0), Some(0));
        assert_eq!(joist_spacing_bucket(12.0), Some(0));
        assert_eq!(joist_spacing_bucket(12.5), Some(1));
        assert_eq!(joist_spacing_bucket(24.0), Some(2));
        assert_eq!(joist_spacing_bucket(24.5), None);
    }

    #[test]
    fn test_joist_lookups() {
        assert_eq!(joist_allowable_span(LumberSize::L2x8, 16.0), Some(142.0));
        assert_eq!(joist_allowable_span(LumberSize::L2x12, 19.2), Some(162.0));
        assert_eq!(joist_max_cantilever(LumberSize::L2x10, 12.0), Some(31.0));
        assert_eq!(joist_allowable_span(LumberSize::L2x4, 16.0), None);
        assert_eq!(joist_allowable_span(LumberSize::L2x8, 30.0), None);
    }

    #[test]
    fn test_post_and_covering_lookups() {
        assert_eq!(max_post_height(LumberSize::L6x6), Some(168.0));
        assert_eq!(max_post_height(LumberSize::L2x4), None);
        assert_eq!(covering_max_joist_spacing(LumberSize::L5_4x6), Some(16.0));
        assert_eq!(covering_max_joist_spacing(LumberSize::L2x12), None);
    }

    #[test]
    fn test_beam_lookup_default_patio() {
        // Inner beams of the default patio: posts 92.5" apart, 72.3" of joists
        let BeamLookup::Found(requirement) = beam_requirement(92.5, 217.0 / 3.0) else {
            panic!("expected a table entry");
        };
        assert_eq!(requirement.primary, BeamCombination::two_by(2, 10.0));
        assert_eq!(requirement.alternate, Some(BeamCombination::two_by(3, 8.0)));
        assert!(requirement.is_met_by(2, 2.0, 10.0));
        assert!(requirement.is_met_by(3, 2.0, 8.0));
        assert!(!requirement.is_met_by(2, 2.0, 8.0));
    }

    #[test]
    fn test_beam_lookup_out_of_range() {
        assert_eq!(beam_requirement(150.0, 48.0), BeamLookup::PostSpacingOutOfRange);
        assert_eq!(beam_requirement(144.0, 150.0), BeamLookup::NoCombination);
        assert_eq!(beam_requirement(48.0, 200.0), BeamLookup::NoCombination);
    }

    #[test]
    fn test_branches_order() {
        let BeamLookup::Found(requirement) = beam_requirement(120.0, 96.0) else {
            panic!("expected a table entry");
        };
        let faces: Vec<f64> = requirement.branches().map(|b| b.face).collect();
        assert_eq!(faces, vec![12.0, 10.0]);
    }
}
