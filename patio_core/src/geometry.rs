//! # Geometry Primitives
//!
//! [`Dimension`] is a (width, height, depth) size in inches whose meaning
//! depends on the structural role it belongs to; [`Position`] is an
//! (x, y, z) point in world space.
//!
//! World axes: X runs away from the house (patio depth), Y is vertical,
//! Z runs along the house wall (patio width).

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A (width, height, depth) size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Dimension {
    pub const fn new(width: f64, height: f64, depth: f64) -> Self {
        Dimension { width, height, depth }
    }

    /// True when any component is negative (or NaN)
    pub fn is_not_valid(&self) -> bool {
        !(self.width >= 0.0 && self.height >= 0.0 && self.depth >= 0.0)
    }

    pub fn with_width(self, width: f64) -> Self {
        Dimension { width, ..self }
    }

    pub fn with_height(self, height: f64) -> Self {
        Dimension { height, ..self }
    }

    pub fn with_depth(self, depth: f64) -> Self {
        Dimension { depth, ..self }
    }
}

impl Add for Dimension {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Dimension::new(self.width + rhs.width, self.height + rhs.height, self.depth + rhs.depth)
    }
}

impl Sub for Dimension {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Dimension::new(self.width - rhs.width, self.height - rhs.height, self.depth - rhs.depth)
    }
}

impl Mul<f64> for Dimension {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Dimension::new(self.width * rhs, self.height * rhs, self.depth * rhs)
    }
}

impl Div<f64> for Dimension {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Dimension::new(self.width / rhs, self.height / rhs, self.depth / rhs)
    }
}

/// An (x, y, z) point in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Position { x, y, z }
    }

    /// Component-wise minimum
    pub fn min(self, other: Self) -> Self {
        Position::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum
    pub fn max(self, other: Self) -> Self {
        Position::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Position {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Position::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Position {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Position::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}
