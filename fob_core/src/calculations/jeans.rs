//! # Denim Jeans Calculation
//!
//! Consumption is driven by the leg: inseam plus the mean of front and back
//! rise, plus allowance. Waist, thigh, leg opening and fabric width are
//! recorded with the style but not used by the formula.

use serde::{Deserialize, Serialize};

use super::pricing::{ensure_non_negative, CommonInputs};
use super::shirt::{woven_breakdown, WovenBreakdown};
use super::GarmentType;
use crate::errors::CostResult;
use crate::units::Inches;

fn default_fabric_allowance() -> f64 {
    2.0
}

/// Input parameters for denim jeans. Lengths in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JeansInput {
    /// Style identity, margin and per-piece add-ons
    #[serde(flatten)]
    pub common: CommonInputs,

    /// Waist (recorded only)
    pub waist: f64,

    /// Inside leg length
    pub inseam: f64,

    /// Thigh width (recorded only)
    pub thigh_width: f64,

    /// Front rise
    pub front_rise: f64,

    /// Back rise
    pub back_rise: f64,

    /// Leg opening (recorded only)
    pub leg_opening: f64,

    /// Cuttable denim width (recorded only)
    pub denim_fabric_width: f64,

    /// Cutting and process wastage in percent
    pub jeans_wastage_percent: f64,

    /// Seam and hem allowance
    #[serde(default = "default_fabric_allowance")]
    pub jeans_fabric_allowance: f64,

    /// Denim price in USD per yard
    pub fabric_price_per_yard: f64,
}

impl JeansInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CostResult<()> {
        self.common.validate()?;
        ensure_non_negative("waist", self.waist)?;
        ensure_non_negative("inseam", self.inseam)?;
        ensure_non_negative("thigh_width", self.thigh_width)?;
        ensure_non_negative("front_rise", self.front_rise)?;
        ensure_non_negative("back_rise", self.back_rise)?;
        ensure_non_negative("leg_opening", self.leg_opening)?;
        ensure_non_negative("denim_fabric_width", self.denim_fabric_width)?;
        ensure_non_negative("jeans_wastage_percent", self.jeans_wastage_percent)?;
        ensure_non_negative("jeans_fabric_allowance", self.jeans_fabric_allowance)?;
        ensure_non_negative("fabric_price_per_yard", self.fabric_price_per_yard)
    }

    /// Mean of front and back rise
    pub fn average_rise(&self) -> Inches {
        (Inches(self.front_rise) + Inches(self.back_rise)) / 2.0
    }

    /// Inseam + average rise + allowance
    pub fn total_length(&self) -> Inches {
        Inches(self.inseam) + self.average_rise() + Inches(self.jeans_fabric_allowance)
    }
}

/// Calculate the denim jeans cost breakdown.
pub fn calculate(input: &JeansInput) -> CostResult<WovenBreakdown> {
    input.validate()?;

    Ok(woven_breakdown(
        GarmentType::Jeans,
        input.total_length(),
        Some(input.average_rise()),
        input.jeans_wastage_percent,
        input.fabric_price_per_yard,
        &input.common,
    ))
}
