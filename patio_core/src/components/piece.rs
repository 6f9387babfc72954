//! A single board.

use serde::{Deserialize, Serialize};

use crate::components::StructuralRole;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Dimension, Position};
use crate::materials::{section_label, SizeConvention};

/// One physical board.
///
/// `dimensions` are the cut size, `buying_dimensions` the catalog board it
/// is cut from (the same unless the piece was trimmed). The bounding-box
/// corners are derived from the center, the cut size and the role's
/// orientation, and are refreshed by every setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    dimensions: Dimension,
    buying_dimensions: Dimension,
    center: Position,
    role: StructuralRole,
    min_corner: Position,
    max_corner: Position,
}

impl Piece {
    /// Create a piece bought at its cut size.
    pub fn new(dimensions: Dimension, center: Position, role: StructuralRole) -> CalcResult<Self> {
        check_dimensions("dimensions", dimensions)?;
        let mut piece = Piece {
            dimensions,
            buying_dimensions: dimensions,
            center,
            role,
            min_corner: center,
            max_corner: center,
        };
        piece.refresh_corners();
        Ok(piece)
    }

    /// Override the catalog size this piece is bought as.
    pub fn with_buying_dimensions(mut self, buying: Dimension) -> CalcResult<Self> {
        check_dimensions("buying_dimensions", buying)?;
        self.buying_dimensions = buying;
        Ok(self)
    }

    pub fn dimensions(&self) -> Dimension {
        self.dimensions
    }

    pub fn buying_dimensions(&self) -> Dimension {
        self.buying_dimensions
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn role(&self) -> StructuralRole {
        self.role
    }

    pub fn min_corner(&self) -> Position {
        self.min_corner
    }

    pub fn max_corner(&self) -> Position {
        self.max_corner
    }

    /// Change the cut size; the buying size follows unless it was overridden.
    pub fn set_dimensions(&mut self, dimensions: Dimension) -> CalcResult<()> {
        check_dimensions("dimensions", dimensions)?;
        if self.buying_dimensions == self.dimensions {
            self.buying_dimensions = dimensions;
        }
        self.dimensions = dimensions;
        self.refresh_corners();
        Ok(())
    }

    pub fn set_center(&mut self, center: Position) {
        self.center = center;
        self.refresh_corners();
    }

    pub fn set_role(&mut self, role: StructuralRole) {
        self.role = role;
        self.refresh_corners();
    }

    /// (thickness, face) of the catalog board, in inches
    pub fn catalog_section(&self) -> (f64, f64) {
        self.role.catalog_section(self.buying_dimensions)
    }

    /// Length of the catalog board, in inches
    pub fn catalog_length(&self) -> f64 {
        self.role.length(self.buying_dimensions)
    }

    /// Catalog label of the board this piece is bought as (e.g. "2x8")
    pub fn catalog_label(&self, convention: SizeConvention) -> String {
        let (thickness, face) = self.catalog_section();
        section_label(thickness, face, convention)
    }

    fn refresh_corners(&mut self) {
        let offset = self.role.world_extent(self.dimensions) / 2.0;
        self.min_corner = self.center - offset;
        self.max_corner = self.center + offset;
    }
}

fn check_dimensions(field: &str, dimensions: Dimension) -> CalcResult<()> {
    if dimensions.is_not_valid() {
        return Err(CalcError::invalid_input(
            field,
            format!("{:?}", dimensions),
            "Piece dimensions cannot be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_follow_role_orientation() {
        // A 2x8 joist 80" long: length runs along X, face is vertical.
        let joist = Piece::new(
            Dimension::new(7.25, 1.5, 80.0),
            Position::new(40.0, 60.0, 10.0),
            StructuralRole::Joist,
        )
        .unwrap();
        assert_eq!(joist.min_corner(), Position::new(0.0, 56.375, 9.25));
        assert_eq!(joist.max_corner(), Position::new(80.0, 63.625, 10.75));
    }

    #[test]
    fn test_corners_refresh_on_change() {
        let mut post = Piece::new(
            Dimension::new(3.5, 3.5, 50.0),
            Position::new(0.0, 25.0, 0.0),
            StructuralRole::Post,
        )
        .unwrap();
        post.set_center(Position::new(10.0, 25.0, 0.0));
        assert_eq!(post.min_corner().x, 8.25);

        post.set_dimensions(Dimension::new(5.5, 5.5, 60.0)).unwrap();
        assert_eq!(post.max_corner().y, 55.0);
        assert_eq!(post.buying_dimensions(), post.dimensions());

        post.set_role(StructuralRole::Beam);
        // As a beam the 60" side lies along Z.
        assert_eq!(post.max_corner().z, 30.0);
    }

    #[test]
    fn test_buying_dimensions_override() {
        let plank = Piece::new(
            Dimension::new(3.0, 1.0, 188.5),
            Position::new(1.5, 0.0, 94.25),
            StructuralRole::Covering,
        )
        .unwrap()
        .with_buying_dimensions(Dimension::new(5.5, 1.0, 188.5))
        .unwrap();
        assert_eq!(plank.catalog_label(SizeConvention::Nominal), "5/4x6");
        assert_eq!(plank.dimensions().width, 3.0);
        assert_eq!(plank.catalog_length(), 188.5);
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let result = Piece::new(
            Dimension::new(-1.0, 1.0, 1.0),
            Position::default(),
            StructuralRole::Post,
        );
        assert!(matches!(result, Err(CalcError::InvalidInput { .. })));
    }
}
