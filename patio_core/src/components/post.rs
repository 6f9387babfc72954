//! Posts: one vertical board under a beam.

use serde::{Deserialize, Serialize};

use crate::components::{Piece, RoleStyle, StructuralGroup, StructuralRole};
use crate::errors::CalcResult;
use crate::geometry::{Dimension, Position};

/// Scalars a post needs from the specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostLayout {
    /// Post size; `depth` is the post length
    pub dimensions: Dimension,
    /// Distance between beams along X
    pub joist_span: f64,
    /// Distance between posts along one beam
    pub spacing: f64,
}

/// A post standing under beam `beam_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    group: StructuralGroup,
    beam_index: usize,
    index_in_beam: usize,
}

impl Post {
    /// Lay out the `index_in_beam`-th post under beam `beam_index`.
    ///
    /// The post stands on the ground (y = length / 2) at
    /// x = beam_index × joist span and z = index_in_beam × spacing,
    /// shifted by half the post width so the outer faces line up with the
    /// beam ends.
    pub fn generate(layout: &PostLayout, beam_index: usize, index_in_beam: usize, style: RoleStyle) -> CalcResult<Self> {
        let d = layout.dimensions;
        let center = Position::new(
            beam_index as f64 * layout.joist_span,
            d.depth / 2.0,
            index_in_beam as f64 * layout.spacing + d.width / 2.0,
        );

        let mut group = StructuralGroup::new(
            format!("Post {}.{}", beam_index, index_in_beam + 1),
            StructuralRole::Post,
            style,
        );
        group.push(Piece::new(d, center, StructuralRole::Post)?);

        Ok(Post {
            group,
            beam_index,
            index_in_beam,
        })
    }

    pub fn group(&self) -> &StructuralGroup {
        &self.group
    }

    /// Index of the beam this post supports
    pub fn beam_index(&self) -> usize {
        self.beam_index
    }

    pub fn index_in_beam(&self) -> usize {
        self.index_in_beam
    }

    /// Post length in inches
    pub fn length(&self) -> CalcResult<f64> {
        Ok(self.group.first()?.dimensions().depth)
    }
}
