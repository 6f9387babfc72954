//! Covering: the decking planks.
//!
//! Planks run along Z and are laid from the house (x = 0) outward. The
//! plank count is `ceil(depth / (plank width + spacing))`; the first plank
//! takes whatever width keeps the total coverage exact, capped at the
//! catalog width, and anything beyond the cap becomes a leading gap
//! against the house:
//!
//! ```text
//! gap + first + (count - 1) × (spacing + width) == patio depth
//! ```

use serde::{Deserialize, Serialize};

use crate::components::{Piece, RoleStyle, StructuralGroup, StructuralRole};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Dimension, Position};
use crate::specification::EPSILON;

/// Scalars the covering needs from the specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoveringLayout {
    /// Catalog plank size; `width` is the face, `height` the thickness,
    /// `depth` the length
    pub plank: Dimension,
    /// Gap between planks
    pub spacing: f64,
    /// Depth to cover along X
    pub patio_depth: f64,
    /// Height of the planks' underside (top of the joists)
    pub base_height: f64,
}

/// The decking surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Covering {
    group: StructuralGroup,
    leading_gap: f64,
}

impl Covering {
    /// Number of planks needed to cover `patio_depth`.
    pub fn plank_count(layout: &CoveringLayout) -> CalcResult<u32> {
        let pitch = layout.plank.width + layout.spacing;
        if pitch <= 0.0 {
            return Err(CalcError::invalid_input(
                "covering_dimensions",
                pitch.to_string(),
                "Plank width plus spacing must be positive",
            ));
        }
        if layout.patio_depth <= 0.0 {
            return Err(CalcError::invalid_input(
                "patio_depth",
                layout.patio_depth.to_string(),
                "Patio depth must be positive",
            ));
        }
        let count = ((layout.patio_depth - EPSILON) / pitch).ceil();
        Ok(count.max(1.0) as u32)
    }

    pub fn generate(layout: &CoveringLayout, style: RoleStyle) -> CalcResult<Self> {
        let count = Self::plank_count(layout)?;
        let plank = layout.plank;
        let pitch = plank.width + layout.spacing;

        let remainder = layout.patio_depth - (count - 1) as f64 * pitch;
        let first_width = remainder.min(plank.width);
        let leading_gap = remainder - first_width;

        let y = layout.base_height + plank.height / 2.0;
        let z = plank.depth / 2.0;
        let mut group = StructuralGroup::new("Covering", StructuralRole::Covering, style);

        let first = Piece::new(
            plank.with_width(first_width),
            Position::new(leading_gap + first_width / 2.0, y, z),
            StructuralRole::Covering,
        )?
        .with_buying_dimensions(plank)?;
        group.push(first);

        if count > 1 {
            // The second plank starts one spacing past the trimmed first one;
            // every later plank is one full pitch further out.
            let mut x = leading_gap + first_width + layout.spacing + plank.width / 2.0;
            for _ in 1..count {
                group.push(Piece::new(plank, Position::new(x, y, z), StructuralRole::Covering)?);
                x += pitch;
            }
        }

        Ok(Covering { group, leading_gap })
    }

    pub fn group(&self) -> &StructuralGroup {
        &self.group
    }

    /// Empty space between the house and the first plank
    pub fn leading_gap(&self) -> f64 {
        self.leading_gap
    }

    /// Total depth covered: planks, gaps between them, and the leading gap
    pub fn covered_depth(&self, spacing: f64) -> f64 {
        let planks: f64 = self.group.pieces().iter().map(|p| p.dimensions().width).sum();
        let gaps = self.group.len().saturating_sub(1) as f64 * spacing;
        self.leading_gap + planks + gaps
    }
}
