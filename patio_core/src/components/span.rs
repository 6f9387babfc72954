//! Spans: a bay of parallel joists between two beams.

use serde::{Deserialize, Serialize};

use crate::components::{Piece, RoleStyle, StructuralGroup, StructuralRole};
use crate::errors::CalcResult;
use crate::geometry::{Dimension, Position};

/// Scalars a span needs from the specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanLayout {
    /// Joist size; `width` is the vertical face, `height` the thickness,
    /// `depth` the length
    pub joist: Dimension,
    /// Center-to-center joist spacing along Z
    pub joist_spacing: f64,
    pub joists_per_span: u32,
    /// Distance between beams along X
    pub joist_span: f64,
    pub cantilever_length: f64,
    /// Beam length along Z
    pub beam_length: f64,
    /// Height of the joists' underside (top of the beams)
    pub base_height: f64,
    /// Total number of spans; the last one carries the cantilever
    pub span_amount: u32,
}

/// A bay of joists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    group: StructuralGroup,
    index: usize,
}

impl Span {
    /// Lay out span `index`.
    ///
    /// Even spans start their joists flush with the z = 0 end of the beams,
    /// odd spans flush with the far end, so joists of neighbouring spans
    /// overlap side by side over the shared beam.
    pub fn generate(layout: &SpanLayout, index: usize, style: RoleStyle) -> CalcResult<Self> {
        let joist = layout.joist;
        let is_outermost = index + 1 == layout.span_amount as usize;
        let cantilever = if is_outermost { layout.cantilever_length } else { 0.0 };

        let dimensions = joist.with_depth(joist.depth + cantilever);
        let x = index as f64 * layout.joist_span + layout.joist_span / 2.0 + cantilever / 2.0;
        let y = layout.base_height + joist.width / 2.0;
        let half_thickness = joist.height / 2.0;

        let mut group = StructuralGroup::new(format!("Span {}", index + 1), StructuralRole::Joist, style);
        for j in 0..layout.joists_per_span {
            let along = j as f64 * layout.joist_spacing + half_thickness;
            let z = if index % 2 == 0 { along } else { layout.beam_length - along };
            group.push(Piece::new(dimensions, Position::new(x, y, z), StructuralRole::Joist)?);
        }

        Ok(Span { group, index })
    }

    pub fn group(&self) -> &StructuralGroup {
        &self.group
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn joist_count(&self) -> usize {
        self.group.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Rgb;

    fn layout() -> SpanLayout {
        SpanLayout {
            joist: Dimension::new(7.25, 1.5, 81.0),
            joist_spacing: 16.0,
            joists_per_span: 12,
            joist_span: 72.0,
            cantilever_length: 8.0,
            beam_length: 188.5,
            base_height: 62.25,
            span_amount: 3,
        }
    }

    fn style() -> RoleStyle {
        RoleStyle::new(Rgb::new(0, 0, 0))
    }

    #[test]
    fn test_joist_positions_even_span() {
        let span = Span::generate(&layout(), 0, style()).unwrap();
        assert_eq!(span.joist_count(), 12);
        let first = &span.group().pieces()[0];
        assert_eq!(first.center(), Position::new(36.0, 65.875, 0.75));
        assert_eq!(first.min_corner().z, 0.0);
        assert_eq!(span.group().pieces()[11].center().z, 176.75);
    }

    #[test]
    fn test_odd_span_mirrors_to_far_edge() {
        let span = Span::generate(&layout(), 1, style()).unwrap();
        let first = &span.group().pieces()[0];
        assert_eq!(first.center().x, 108.0);
        assert_eq!(first.max_corner().z, 188.5);
        assert_eq!(span.group().pieces()[1].center().z, 188.5 - 16.75);
    }

    #[test]
    fn test_outermost_span_carries_cantilever() {
        let inner = Span::generate(&layout(), 1, style()).unwrap();
        let outer = Span::generate(&layout(), 2, style()).unwrap();
        assert_eq!(inner.group().pieces()[0].dimensions().depth, 81.0);
        let piece = &outer.group().pieces()[0];
        assert_eq!(piece.dimensions().depth, 89.0);
        assert_eq!(piece.center().x, 2.0 * 72.0 + 36.0 + 4.0);
        assert_eq!(piece.buying_dimensions().depth, 89.0);
    }
}
