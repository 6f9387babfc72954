//! # Validator
//!
//! Pure rule evaluation of a generated patio against the code tables.
//!
//! The violation set is always rebuilt from the live components; nothing
//! from a previous run is reused. Sizes are read back from the pieces
//! (their buying dimensions), not from the specification, so a piece that
//! was generated at an odd size is caught even if the specification looks
//! fine.
//!
//! ## Beam rule
//!
//! A beam passes if it meets the primary or the alternate table entry in
//! full. Otherwise it is flagged against the primary entry alone: a section
//! smaller than the primary's gives a dimension violation, fewer plies than
//! the primary's gives a plies violation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::code_tables::{self, BeamLookup};
use crate::components::{Beam, Component, Post};
use crate::errors::CalcResult;
use crate::materials::{BeamDesignation, LumberSize};
use crate::specification::{Specification, EPSILON};

/// One category of code-compliance failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Violation {
    /// Post taller than its section allows
    PostHeight,
    /// Post section not in the post table
    PostDimensions,
    /// Beams further apart than the joists can span
    SpanLength,
    /// Joists further apart than the tables allow
    JoistSpacing,
    /// Joist section not in the joist table
    JoistDimensions,
    /// Joists overhang the outermost beam too far
    CantileverLength,
    /// Decking section not in the decking table
    CoveringDimensions,
    BeamDimensionsOneSpan,
    BeamDimensionsTwoSpans,
    PliesOneSpan,
    PliesTwoSpans,
    /// Posts further apart than the beam table goes
    PostSpacing,
    /// The optimizer found no compliant configuration
    NoOptimalConfiguration,
}

impl Violation {
    pub fn description(&self) -> &'static str {
        match self {
            Violation::PostHeight => "Posts are too tall for their size",
            Violation::PostDimensions => "Post size is not allowed",
            Violation::SpanLength => "Joist span is too long for the joist size",
            Violation::JoistSpacing => "Joist spacing is too wide",
            Violation::JoistDimensions => "Joist size is not allowed",
            Violation::CantileverLength => "Cantilever is too long for the joist size",
            Violation::CoveringDimensions => "Decking size is not allowed",
            Violation::BeamDimensionsOneSpan => "Beam carrying one span is too small",
            Violation::BeamDimensionsTwoSpans => "Beam carrying two spans is too small",
            Violation::PliesOneSpan => "Beam carrying one span needs more plies",
            Violation::PliesTwoSpans => "Beam carrying two spans needs more plies",
            Violation::PostSpacing => "Posts are too far apart",
            Violation::NoOptimalConfiguration => "No compliant configuration was found",
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Check every generated component against the code tables.
pub fn validate(spec: &Specification, components: &[Component]) -> BTreeSet<Violation> {
    let mut violations = BTreeSet::new();
    let span_count = components.iter().filter(|c| matches!(c, Component::Span(_))).count();
    let posts: Vec<&Post> = components
        .iter()
        .filter_map(|c| match c {
            Component::Post(post) => Some(post),
            _ => None,
        })
        .collect();

    for component in components {
        match component {
            Component::Post(post) => {
                let Some(piece) = post.group().pieces().first() else { continue };
                let (thickness, face) = piece.catalog_section();
                match LumberSize::from_actual_dimensions(thickness, face).and_then(code_tables::max_post_height) {
                    None => {
                        violations.insert(Violation::PostDimensions);
                    }
                    Some(max) if piece.catalog_length() > max => {
                        violations.insert(Violation::PostHeight);
                    }
                    Some(_) => {}
                }
            }
            Component::Beam(beam) if !beam.is_house_beam() => {
                let Some(post_spacing) = supported_length(beam, &posts) else {
                    violations.insert(Violation::PostSpacing);
                    continue;
                };
                let two_spans = beam.supported_spans().len() >= 2;
                let tributary = tributary_length(spec, beam, span_count);
                let lookup = code_tables::beam_requirement(post_spacing, tributary);
                violations.extend(beam_violations(lookup, beam.designation(), two_spans));
            }
            _ => {}
        }
    }

    check_joists(spec, components, &mut violations);
    check_covering(spec, components, &mut violations);
    violations
}

fn check_joists(spec: &Specification, components: &[Component], violations: &mut BTreeSet<Violation>) {
    let Some(piece) = components
        .iter()
        .find(|c| matches!(c, Component::Span(_)))
        .and_then(|c| c.pieces().first())
    else {
        return;
    };

    let spacing = spec.joist_spacing();
    if code_tables::joist_spacing_bucket(spacing).is_none() {
        violations.insert(Violation::JoistSpacing);
        return;
    }

    let (thickness, face) = piece.catalog_section();
    let Some(joist) = LumberSize::from_actual_dimensions(thickness, face) else {
        violations.insert(Violation::JoistDimensions);
        return;
    };
    match (
        code_tables::joist_allowable_span(joist, spacing),
        code_tables::joist_max_cantilever(joist, spacing),
    ) {
        (Some(max_span), Some(max_cantilever)) => {
            if spec.joist_span() > max_span {
                violations.insert(Violation::SpanLength);
            }
            if spec.cantilever_length() > max_cantilever {
                violations.insert(Violation::CantileverLength);
            }
        }
        _ => {
            violations.insert(Violation::JoistDimensions);
        }
    }
}

fn check_covering(spec: &Specification, components: &[Component], violations: &mut BTreeSet<Violation>) {
    let Some(piece) = components
        .iter()
        .find(|c| matches!(c, Component::Covering(_)))
        .and_then(|c| c.pieces().first())
    else {
        return;
    };

    let (thickness, face) = piece.catalog_section();
    match LumberSize::from_actual_dimensions(thickness, face).and_then(code_tables::covering_max_joist_spacing) {
        None => {
            violations.insert(Violation::CoveringDimensions);
        }
        Some(max) if spec.joist_spacing() > max => {
            violations.insert(Violation::JoistSpacing);
        }
        Some(_) => {}
    }
}

/// Longest center-to-center stretch between neighbouring posts under a
/// beam.
///
/// `None` when the beam stands on fewer than two posts, or overhangs an end
/// post by more than [`code_tables::MAX_BEAM_OVERHANG_RATIO`] of that
/// stretch.
fn supported_length(beam: &Beam, posts: &[&Post]) -> Option<f64> {
    let (beam_lo, beam_hi) = beam.group().bounds().ok()?;
    let mut extents = beam
        .supporting_posts()
        .iter()
        .filter_map(|&i| posts.get(i)?.group().bounds().ok())
        .map(|(lo, hi)| (lo.z, hi.z))
        .collect::<Vec<_>>();
    if extents.len() < 2 {
        return None;
    }
    extents.sort_by(|a, b| a.0.total_cmp(&b.0));

    let longest = extents
        .windows(2)
        .map(|pair| (pair[1].0 + pair[1].1 - pair[0].0 - pair[0].1) / 2.0)
        .fold(0.0, f64::max);
    let first = extents[0];
    let last = extents[extents.len() - 1];
    let overhang = (first.0 - beam_lo.z).max(beam_hi.z - last.1).max(0.0);
    if overhang > longest * code_tables::MAX_BEAM_OVERHANG_RATIO + EPSILON {
        return None;
    }
    Some(longest)
}

/// Length of joists a beam carries: a full span between two spans, half a
/// span plus the cantilever for the outermost beam, half a span otherwise.
fn tributary_length(spec: &Specification, beam: &Beam, span_count: usize) -> f64 {
    let span = spec.joist_span();
    if beam.supported_spans().len() >= 2 {
        return span;
    }
    let carries_outermost = beam.supported_spans().iter().any(|&i| i + 1 == span_count);
    if carries_outermost {
        span / 2.0 + spec.cantilever_length()
    } else {
        span / 2.0
    }
}

/// Violations of one beam against its table lookup.
pub fn beam_violations(lookup: BeamLookup, designation: Option<BeamDesignation>, two_spans: bool) -> Vec<Violation> {
    let (dimensions, plies) = if two_spans {
        (Violation::BeamDimensionsTwoSpans, Violation::PliesTwoSpans)
    } else {
        (Violation::BeamDimensionsOneSpan, Violation::PliesOneSpan)
    };

    let requirement = match lookup {
        BeamLookup::Found(requirement) => requirement,
        BeamLookup::PostSpacingOutOfRange => return vec![Violation::PostSpacing],
        BeamLookup::NoCombination => return vec![dimensions],
    };
    let Some(designation) = designation else {
        return vec![dimensions];
    };

    let (thickness, face) = designation.size.nominal_dimensions();
    if requirement.is_met_by(designation.plies, thickness, face) {
        return Vec::new();
    }

    let mut found = Vec::new();
    if !requirement.primary.section_fits(thickness, face) {
        found.push(dimensions);
    }
    if designation.plies < requirement.primary.plies {
        found.push(plies);
    }
    found
}

/// Table lookup for the most heavily loaded beam of a specification.
///
/// That is the larger of an inner beam carrying two full spans (when there
/// are at least three beams) and the outermost beam carrying half a span
/// plus the cantilever.
pub fn governing_beam_lookup(spec: &Specification) -> CalcResult<BeamLookup> {
    let span = spec.joist_span();
    let outermost = span / 2.0 + spec.cantilever_length();
    let tributary = if spec.beam_amount()? >= 3 { outermost.max(span) } else { outermost };
    Ok(code_tables::beam_requirement(spec.post_spacing(), tributary))
}
