//! # Structural Components
//!
//! Every board of the patio is a [`Piece`]; pieces are grouped into
//! [`StructuralGroup`]s, and each concrete component (post, beam, span of
//! joists, decking) is a generator that lays out its own pieces from a
//! handful of scalars.
//!
//! ## Orientation
//!
//! A [`Dimension`] is (width, height, depth) in the role's own terms. The
//! role decides which world axis each one maps to:
//!
//! | Role     | width | height | depth |
//! |----------|-------|--------|-------|
//! | Post     | Z     | X      | Y     |
//! | Beam     | X     | Y      | Z     |
//! | Joist    | Y     | Z      | X     |
//! | Covering | X     | Y      | Z     |
//!
//! X runs away from the house, Y is vertical, Z runs along the house wall.

pub mod beam;
pub mod covering;
pub mod group;
pub mod piece;
pub mod post;
pub mod span;

use serde::{Deserialize, Serialize};

use crate::geometry::{Dimension, Position};

pub use beam::{Beam, BeamLayout};
pub use covering::{Covering, CoveringLayout};
pub use group::{RoleStyle, Rgb, StructuralGroup};
pub use piece::Piece;
pub use post::{Post, PostLayout};
pub use span::{Span, SpanLayout};

/// The structural role of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructuralRole {
    Post,
    Beam,
    Joist,
    Covering,
}

impl StructuralRole {
    pub const ALL: [StructuralRole; 4] = [
        StructuralRole::Post,
        StructuralRole::Beam,
        StructuralRole::Joist,
        StructuralRole::Covering,
    ];

    /// World-space (x, y, z) extent of a board with these dimensions
    pub fn world_extent(&self, d: Dimension) -> Position {
        match self {
            StructuralRole::Post => Position::new(d.height, d.depth, d.width),
            StructuralRole::Beam => Position::new(d.width, d.height, d.depth),
            StructuralRole::Joist => Position::new(d.depth, d.width, d.height),
            StructuralRole::Covering => Position::new(d.width, d.height, d.depth),
        }
    }

    /// Catalog (thickness, face) of a board with these dimensions
    pub fn catalog_section(&self, d: Dimension) -> (f64, f64) {
        match self {
            StructuralRole::Post => (d.width.min(d.height), d.width.max(d.height)),
            StructuralRole::Beam => (d.width, d.height),
            StructuralRole::Joist => (d.height, d.width),
            StructuralRole::Covering => (d.height, d.width),
        }
    }

    /// Board length; the depth component for every role
    pub fn length(&self, d: Dimension) -> f64 {
        d.depth
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StructuralRole::Post => "Post",
            StructuralRole::Beam => "Beam",
            StructuralRole::Joist => "Joist",
            StructuralRole::Covering => "Covering",
        }
    }
}

impl std::fmt::Display for StructuralRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Any generated component of the patio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Component {
    Post(Post),
    Beam(Beam),
    Span(Span),
    Covering(Covering),
}

impl Component {
    pub fn group(&self) -> &StructuralGroup {
        match self {
            Component::Post(post) => post.group(),
            Component::Beam(beam) => beam.group(),
            Component::Span(span) => span.group(),
            Component::Covering(covering) => covering.group(),
        }
    }

    pub fn name(&self) -> &str {
        self.group().name()
    }

    pub fn role(&self) -> StructuralRole {
        self.group().role()
    }

    pub fn pieces(&self) -> &[Piece] {
        self.group().pieces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_extent_per_role() {
        let d = Dimension::new(1.0, 2.0, 3.0);
        assert_eq!(StructuralRole::Post.world_extent(d), Position::new(2.0, 3.0, 1.0));
        assert_eq!(StructuralRole::Beam.world_extent(d), Position::new(1.0, 2.0, 3.0));
        assert_eq!(StructuralRole::Joist.world_extent(d), Position::new(3.0, 1.0, 2.0));
        assert_eq!(StructuralRole::Covering.world_extent(d), Position::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_catalog_section_per_role() {
        assert_eq!(StructuralRole::Post.catalog_section(Dimension::new(5.5, 3.5, 50.0)), (3.5, 5.5));
        assert_eq!(StructuralRole::Beam.catalog_section(Dimension::new(1.5, 9.25, 188.5)), (1.5, 9.25));
        assert_eq!(StructuralRole::Joist.catalog_section(Dimension::new(7.25, 1.5, 80.0)), (1.5, 7.25));
        assert_eq!(StructuralRole::Covering.catalog_section(Dimension::new(5.5, 1.0, 188.5)), (1.0, 5.5));
    }
}
