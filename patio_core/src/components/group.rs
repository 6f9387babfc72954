//! Named collections of pieces sharing one structural role.

use serde::{Deserialize, Serialize};

use crate::components::{Piece, StructuralRole};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Dimension, Position};
use crate::materials::SizeConvention;

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

/// Display attributes shared by every group of one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStyle {
    pub color: Rgb,
    /// Filled polygons rather than outlines
    pub filled: bool,
    pub visible: bool,
}

impl RoleStyle {
    pub const fn new(color: Rgb) -> Self {
        RoleStyle {
            color,
            filled: true,
            visible: true,
        }
    }
}

/// A named, styled collection of pieces.
///
/// The aggregate queries fail with [`CalcError::EmptyGroup`] when the group
/// holds no pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralGroup {
    name: String,
    role: StructuralRole,
    style: RoleStyle,
    pieces: Vec<Piece>,
}

impl StructuralGroup {
    pub fn new(name: impl Into<String>, role: StructuralRole, style: RoleStyle) -> Self {
        StructuralGroup {
            name: name.into(),
            role,
            style,
            pieces: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> StructuralRole {
        self.role
    }

    pub fn style(&self) -> RoleStyle {
        self.style
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Add a piece; its role is forced to the group's role.
    pub fn push(&mut self, mut piece: Piece) {
        if piece.role() != self.role {
            piece.set_role(self.role);
        }
        self.pieces.push(piece);
    }

    pub(crate) fn first(&self) -> CalcResult<&Piece> {
        self.pieces.first().ok_or_else(|| CalcError::empty_group(&self.name))
    }

    /// Size of the group seen as one member: widths add up (plies side by
    /// side), heights and depths are averaged.
    pub fn combined_size(&self) -> CalcResult<Dimension> {
        self.first()?;
        let count = self.pieces.len() as f64;
        let sum = self
            .pieces
            .iter()
            .fold(Dimension::default(), |acc, piece| acc + piece.dimensions());
        Ok(Dimension::new(sum.width, sum.height / count, sum.depth / count))
    }

    /// Mean of the piece centers
    pub fn combined_position(&self) -> CalcResult<Position> {
        self.first()?;
        let sum = self
            .pieces
            .iter()
            .fold(Position::default(), |acc, piece| acc + piece.center());
        Ok(sum / self.pieces.len() as f64)
    }

    /// World-space bounding box (min corner, max corner)
    pub fn bounds(&self) -> CalcResult<(Position, Position)> {
        let first = self.first()?;
        Ok(self.pieces.iter().fold(
            (first.min_corner(), first.max_corner()),
            |(lo, hi), piece| (lo.min(piece.min_corner()), hi.max(piece.max_corner())),
        ))
    }

    /// Catalog label of the group's boards, e.g. "2x10"
    pub fn nominal_size_label(&self, convention: SizeConvention) -> CalcResult<String> {
        Ok(self.first()?.catalog_label(convention))
    }
}
