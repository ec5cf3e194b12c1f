//! # Unit Types
//!
//! Lightweight newtype wrappers for the measurement units that appear in
//! garment costing, plus the dozen/percent/rounding helpers every calculator
//! shares.
//!
//! ## Units in Use
//!
//! - Knit garments are measured in centimeters, fabric weight in grams per
//!   square meter, consumption in kilograms per dozen.
//! - Woven and denim garments are measured in inches, consumption in yards.
//!
//! ## Example
//!
//! ```rust
//! use fob_core::units::{Inches, Yards, round_to};
//!
//! let length = Inches(54.0);
//! let yards: Yards = length.into();
//! assert_eq!(yards.0, 1.5);
//!
//! assert_eq!(round_to(1.78861, 3), 1.789);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul};

/// Pieces in one dozen
pub const PIECES_PER_DOZEN: f64 = 12.0;

/// Inches in one yard
pub const INCHES_PER_YARD: f64 = 36.0;

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in yards (fabric is bought by the running yard)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Yards(pub f64);

impl From<Inches> for Yards {
    fn from(inches: Inches) -> Self {
        Yards(inches.0 / INCHES_PER_YARD)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

// ============================================================================
// Helpers
// ============================================================================

/// Inflate a value by a percentage: `value * (1 + percent / 100)`.
pub fn apply_percent(value: f64, percent: f64) -> f64 {
    value * (1.0 + percent / 100.0)
}

/// Convert a per-dozen figure to a per-piece figure.
pub fn per_piece(per_dozen: f64) -> f64 {
    per_dozen / PIECES_PER_DOZEN
}

/// Convert a per-piece figure to a per-dozen figure.
pub fn per_dozen(per_piece: f64) -> f64 {
    per_piece * PIECES_PER_DOZEN
}

/// Round half away from zero to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
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

impl_arithmetic!(Centimeters);
impl_arithmetic!(Inches);
impl_arithmetic!(Yards);
impl_arithmetic!(Kilograms);
