//! # Unit Types and Lumber Size Tables
//!
//! Lightweight newtype wrappers for lengths, plus the fixed lookup tables
//! relating *actual* lumber dimensions (what the tape measure reads) to
//! *nominal* ones (what the lumber yard sells) and to their metric
//! equivalents.
//!
//! ## Nominal vs Actual
//!
//! | Nominal | Actual (in) | Metric (mm) |
//! |---------|-------------|-------------|
//! | 1       | 3/4         | 19          |
//! | 5/4     | 1           | 25          |
//! | 2       | 1 1/2       | 38          |
//! | 4       | 3 1/2       | 89          |
//! | 6       | 5 1/2       | 140         |
//! | 8       | 7 1/4       | 184         |
//! | 10      | 9 1/4       | 235         |
//! | 12      | 11 1/4      | 286         |
//!
//! Lookups return `Option`: a value missing from the table is
//! unrepresentable in the catalog, never silently zero. The only place a
//! zero stands in for "unknown" is [`nominal_or_zero`], which exists for
//! display labels.
//!
//! ## Example
//!
//! ```rust
//! use patio_core::units::{self, Feet, Inches};
//!
//! assert_eq!(units::nominal_from_actual(7.25), Some(8.0));
//! assert_eq!(units::nominal_from_actual(7.0), None);
//!
//! let length: Inches = Feet(6.0).into();
//! assert_eq!(length.0, 72.0);
//!
//! assert_eq!(units::parse_fraction("1 1/2").unwrap(), 1.5);
//! assert_eq!(units::format_fraction(7.25, 16), "7 1/4");
//! ```

use std::collections::BTreeMap;
use std::ops::{Add, Div, Mul, Sub};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 / MM_PER_INCH)
    }
}

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(Millimeters);

/// Convert feet to inches
pub fn feet_to_inches(feet: f64) -> f64 {
    Inches::from(Feet(feet)).0
}

/// Convert inches to feet
pub fn inches_to_feet(inches: f64) -> f64 {
    Feet::from(Inches(inches)).0
}

// ============================================================================
// Nominal / Actual / Metric Tables
// ============================================================================

/// One row of the lumber size table.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SizeRow {
    actual_in: f64,
    nominal_in: f64,
    nominal_label: &'static str,
    metric_mm: u32,
}

const SIZE_ROWS: [SizeRow; 10] = [
    SizeRow { actual_in: 0.75, nominal_in: 1.0, nominal_label: "1", metric_mm: 19 },
    SizeRow { actual_in: 1.0, nominal_in: 1.25, nominal_label: "5/4", metric_mm: 25 },
    SizeRow { actual_in: 1.5, nominal_in: 2.0, nominal_label: "2", metric_mm: 38 },
    SizeRow { actual_in: 2.5, nominal_in: 3.0, nominal_label: "3", metric_mm: 64 },
    SizeRow { actual_in: 3.5, nominal_in: 4.0, nominal_label: "4", metric_mm: 89 },
    SizeRow { actual_in: 5.5, nominal_in: 6.0, nominal_label: "6", metric_mm: 140 },
    SizeRow { actual_in: 7.25, nominal_in: 8.0, nominal_label: "8", metric_mm: 184 },
    SizeRow { actual_in: 9.25, nominal_in: 10.0, nominal_label: "10", metric_mm: 235 },
    SizeRow { actual_in: 11.25, nominal_in: 12.0, nominal_label: "12", metric_mm: 286 },
    SizeRow { actual_in: 13.25, nominal_in: 14.0, nominal_label: "14", metric_mm: 337 },
];

/// Normalized table key: hundredths of an inch.
///
/// Negative and non-finite values have no key.
fn table_key(value: f64) -> Option<u32> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * 100.0).round() as u32)
}

static BY_ACTUAL: Lazy<BTreeMap<u32, SizeRow>> = Lazy::new(|| {
    SIZE_ROWS
        .iter()
        .filter_map(|row| table_key(row.actual_in).map(|key| (key, *row)))
        .collect()
});

static BY_NOMINAL: Lazy<BTreeMap<u32, SizeRow>> = Lazy::new(|| {
    SIZE_ROWS
        .iter()
        .filter_map(|row| table_key(row.nominal_in).map(|key| (key, *row)))
        .collect()
});

static BY_METRIC: Lazy<BTreeMap<u32, SizeRow>> =
    Lazy::new(|| SIZE_ROWS.iter().map(|row| (row.metric_mm, *row)).collect());

/// Nominal size for an actual dimension (e.g. 1.5 → 2.0).
pub fn nominal_from_actual(actual_in: f64) -> Option<f64> {
    BY_ACTUAL.get(&table_key(actual_in)?).map(|row| row.nominal_in)
}

/// Actual dimension for a nominal size (e.g. 10.0 → 9.25).
pub fn actual_from_nominal(nominal_in: f64) -> Option<f64> {
    BY_NOMINAL.get(&table_key(nominal_in)?).map(|row| row.actual_in)
}

/// Nominal label for an actual dimension (e.g. 1.0 → "5/4").
pub fn nominal_label(actual_in: f64) -> Option<&'static str> {
    BY_ACTUAL.get(&table_key(actual_in)?).map(|row| row.nominal_label)
}

/// Metric equivalent in millimeters for an actual dimension (e.g. 7.25 → 184).
pub fn metric_from_actual(actual_in: f64) -> Option<u32> {
    BY_ACTUAL.get(&table_key(actual_in)?).map(|row| row.metric_mm)
}

/// Actual dimension in inches for a metric lumber size (e.g. 89 → 3.5).
pub fn actual_from_metric(mm: u32) -> Option<f64> {
    BY_METRIC.get(&mm).map(|row| row.actual_in)
}

/// Nominal size, or 0.0 when the dimension is not in the table.
///
/// Only for display labels; everything that reasons about sizes uses
/// [`nominal_from_actual`].
pub fn nominal_or_zero(actual_in: f64) -> f64 {
    nominal_from_actual(actual_in).unwrap_or(0.0)
}

/// Like [`nominal_from_actual`] but as an error for callers that require a catalog size.
pub fn require_nominal(actual_in: f64) -> CalcResult<f64> {
    nominal_from_actual(actual_in).ok_or_else(|| CalcError::unrepresentable(actual_in))
}

// ============================================================================
// Fractions
// ============================================================================

/// Parse a length written as a whole number, decimal, fraction, or mixed
/// number: `"7"`, `"7.25"`, `"3/4"`, `"5/4"`, `"1 1/2"`, `"11-1/4"`.
pub fn parse_fraction(text: &str) -> CalcResult<f64> {
    let invalid = |reason: &str| CalcError::invalid_input("fraction", text, reason);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid("Empty value"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("Lengths cannot be negative"));
    }

    let normalized = trimmed.replace('-', " ");
    let mut parts = normalized.split_whitespace();
    let first = parts.next().ok_or_else(|| invalid("Empty value"))?;
    let second = parts.next();
    if parts.next().is_some() {
        return Err(invalid("Too many parts"));
    }

    match second {
        Some(frac) => {
            let whole: f64 = first.parse().map_err(|_| invalid("Whole part is not a number"))?;
            if whole < 0.0 || whole.fract() != 0.0 {
                return Err(invalid("Whole part must be a non-negative integer"));
            }
            Ok(whole + parse_simple_fraction(frac).ok_or_else(|| invalid("Malformed fraction"))?)
        }
        None if first.contains('/') => parse_simple_fraction(first).ok_or_else(|| invalid("Malformed fraction")),
        None => first
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| invalid("Not a number")),
    }
}

fn parse_simple_fraction(text: &str) -> Option<f64> {
    let (num, den) = text.split_once('/')?;
    let num: u32 = num.trim().parse().ok()?;
    let den: u32 = den.trim().parse().ok()?;
    if den == 0 {
        return None;
    }
    Some(num as f64 / den as f64)
}

/// Format a length as a mixed number rounded to the nearest `1/denominator`.
///
/// `format_fraction(11.25, 16)` → `"11 1/4"`, `format_fraction(0.75, 16)` → `"3/4"`.
pub fn format_fraction(value: f64, denominator: u32) -> String {
    let denominator = denominator.max(1);
    let negative = value < 0.0;
    let units = (value.abs() * denominator as f64).round() as u64;
    let whole = units / denominator as u64;
    let mut num = units % denominator as u64;
    let mut den = denominator as u64;
    while num != 0 && num % 2 == 0 && den % 2 == 0 {
        num /= 2;
        den /= 2;
    }

    let sign = if negative && units != 0 { "-" } else { "" };
    match (whole, num) {
        (w, 0) => format!("{}{}", sign, w),
        (0, n) => format!("{}{}/{}", sign, n, den),
        (w, n) => format!("{}{} {}/{}", sign, w, n, den),
    }
}

/// Format inches as feet and inches, e.g. `225.0` → `18' 9"`.
pub fn format_feet_inches(inches: f64) -> String {
    let feet = (inches / 12.0).floor();
    let rest = inches - feet * 12.0;
    format!("{}' {}\"", feet as i64, format_fraction(rest, 16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_to_inches() {
        assert_eq!(feet_to_inches(6.25), 75.0);
        assert_eq!(inches_to_feet(18.0), 1.5);
        let mm: Millimeters = Inches(1.0).into();
        assert_eq!(mm.0, 25.4);
    }

    #[test]
    fn test_arithmetic() {
        let a = Inches(10.0);
        let b = Inches(2.5);
        assert_eq!((a + b).0, 12.5);
        assert_eq!((a - b).0, 7.5);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 4.0).value(), 2.5);
    }

    #[test]
    fn test_nominal_actual_lookup() {
        assert_eq!(nominal_from_actual(1.5), Some(2.0));
        assert_eq!(nominal_from_actual(9.25), Some(10.0));
        assert_eq!(nominal_from_actual(1.0), Some(1.25));
        assert_eq!(actual_from_nominal(12.0), Some(11.25));
        assert_eq!(actual_from_nominal(1.25), Some(1.0));
        assert_eq!(nominal_label(1.0), Some("5/4"));
    }

    #[test]
    fn test_unrepresentable_values() {
        assert_eq!(nominal_from_actual(2.0), None);
        assert_eq!(nominal_from_actual(-1.5), None);
        assert_eq!(nominal_from_actual(f64::NAN), None);
        assert_eq!(nominal_or_zero(2.0), 0.0);
        assert!(require_nominal(6.0).is_err());
    }

    #[test]
    fn test_metric_lookup() {
        assert_eq!(metric_from_actual(7.25), Some(184));
        assert_eq!(actual_from_metric(89), Some(3.5));
        assert_eq!(actual_from_metric(90), None);
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("7").unwrap(), 7.0);
        assert_eq!(parse_fraction("7.25").unwrap(), 7.25);
        assert_eq!(parse_fraction("3/4").unwrap(), 0.75);
        assert_eq!(parse_fraction("5/4").unwrap(), 1.25);
        assert_eq!(parse_fraction("1 1/2").unwrap(), 1.5);
        assert_eq!(parse_fraction("11-1/4").unwrap(), 11.25);
        assert!(parse_fraction("").is_err());
        assert!(parse_fraction("1/0").is_err());
        assert!(parse_fraction("1 2 3").is_err());
        assert!(parse_fraction("abc").is_err());
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_fraction(1.5, 16), "1 1/2");
        assert_eq!(format_fraction(0.75, 16), "3/4");
        assert_eq!(format_fraction(9.0, 16), "9");
        assert_eq!(format_fraction(3.0625, 16), "3 1/16");
        assert_eq!(format_fraction(2.49, 4), "2 1/2");
    }

    #[test]
    fn test_format_feet_inches() {
        assert_eq!(format_feet_inches(225.0), "18' 9\"");
        assert_eq!(format_feet_inches(188.5), "15' 8 1/2\"");
    }
}
