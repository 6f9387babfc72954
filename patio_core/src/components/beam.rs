//! Beams: one or more plies side by side, parallel to the house.

use serde::{Deserialize, Serialize};

use crate::components::{Piece, RoleStyle, StructuralGroup, StructuralRole};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Dimension, Position};
use crate::materials::{BeamDesignation, LumberSize};

/// Scalars a beam needs from the specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamLayout {
    /// Size of one ply; `width` is the ply thickness, `depth` the beam length
    pub ply: Dimension,
    pub plies: u32,
    /// Distance between beams along X
    pub joist_span: f64,
    /// Height of the beam's underside (top of the posts)
    pub base_height: f64,
}

/// A multi-ply beam.
///
/// Which spans it carries and which posts hold it up are assigned by the
/// orchestrator after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    group: StructuralGroup,
    index: usize,
    plies: u32,
    supported_spans: Vec<usize>,
    supporting_posts: Vec<usize>,
}

impl Beam {
    /// Lay out beam `index` (0 is the beam against the house).
    pub fn generate(layout: &BeamLayout, index: usize, style: RoleStyle) -> CalcResult<Self> {
        if layout.plies == 0 {
            return Err(CalcError::invalid_input("plies_per_beam", "0", "A beam needs at least one ply"));
        }

        let ply = layout.ply;
        let count = layout.plies as f64;
        // Full multi-ply thickness; the house beam is pushed out by half of
        // it so its inner face sits on the wall line.
        let spread = ply.width * count;
        let house_offset = if index == 0 { spread / 2.0 } else { 0.0 };
        let x0 = index as f64 * layout.joist_span + house_offset;

        let mut group = StructuralGroup::new(format!("Beam {}", index), StructuralRole::Beam, style);
        for k in 0..layout.plies {
            let offset = (k as f64 - (count - 1.0) / 2.0) * ply.width;
            let center = Position::new(x0 + offset, layout.base_height + ply.height / 2.0, ply.depth / 2.0);
            group.push(Piece::new(ply, center, StructuralRole::Beam)?);
        }

        Ok(Beam {
            group,
            index,
            plies: layout.plies,
            supported_spans: Vec::new(),
            supporting_posts: Vec::new(),
        })
    }

    pub fn group(&self) -> &StructuralGroup {
        &self.group
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn plies(&self) -> u32 {
        self.plies
    }

    /// The beam fastened to the house wall
    pub fn is_house_beam(&self) -> bool {
        self.index == 0
    }

    /// Indices of the spans resting on this beam
    pub fn supported_spans(&self) -> &[usize] {
        &self.supported_spans
    }

    /// Indices (into the post list) of the posts under this beam
    pub fn supporting_posts(&self) -> &[usize] {
        &self.supporting_posts
    }

    pub fn assign_spans(&mut self, spans: Vec<usize>) {
        self.supported_spans = spans;
    }

    pub fn assign_posts(&mut self, posts: Vec<usize>) {
        self.supporting_posts = posts;
    }

    /// Catalog designation such as "2-2x10", if the ply is a catalog size
    pub fn designation(&self) -> Option<BeamDesignation> {
        let (thickness, face) = self.group.pieces().first()?.catalog_section();
        LumberSize::from_actual_dimensions(thickness, face).map(|size| BeamDesignation::new(size, self.plies))
    }
}
