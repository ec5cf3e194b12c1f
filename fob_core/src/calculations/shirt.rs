//! # Woven Shirt Calculation
//!
//! Estimates woven fabric consumption in yards from body and sleeve lengths.
//! Chest, collar and fabric width are recorded with the style but do not
//! enter the current consumption formula.
//!
//! The yardage-to-price steps are shared with denim (see [`woven_breakdown`]).

use serde::{Deserialize, Serialize};

use super::pricing::{ensure_non_negative, price_from_fabric_cost, CommonInputs};
use super::GarmentType;
use crate::errors::CostResult;
use crate::units::{apply_percent, per_dozen, round_to, Inches, Yards};

/// Fixed yardage for collar, cuffs, pockets (or pockets, waistband, loops on denim)
pub const TRIM_ALLOWANCE_YARDS: f64 = 0.15;

fn default_fabric_allowance() -> f64 {
    2.0
}

/// Input parameters for a woven shirt. Lengths in inches.
///
/// ## JSON Example
///
/// ```json
/// {
///   "garment_type": "shirt",
///   "style_name": "OX-22",
///   "shirt_body_length": 30,
///   "shirt_sleeve_length": 25,
///   "shirt_chest_width": 22,
///   "shirt_collar": 15.5,
///   "fabric_width": 58,
///   "shirt_wastage_percent": 5,
///   "shirt_fabric_allowance": 2,
///   "fabric_price_per_yard": 3.5,
///   "profit_margin_percent": 15
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShirtInput {
    /// Style identity, margin and per-piece add-ons
    #[serde(flatten)]
    pub common: CommonInputs,

    /// Back body length
    pub shirt_body_length: f64,

    /// Sleeve length
    pub shirt_sleeve_length: f64,

    /// Half chest width (recorded only)
    pub shirt_chest_width: f64,

    /// Collar size (recorded only)
    pub shirt_collar: f64,

    /// Cuttable fabric width (recorded only)
    pub fabric_width: f64,

    /// Cutting and process wastage in percent
    pub shirt_wastage_percent: f64,

    /// Seam allowance added to body and to sleeve
    #[serde(default = "default_fabric_allowance")]
    pub shirt_fabric_allowance: f64,

    /// Fabric price in USD per yard
    pub fabric_price_per_yard: f64,
}

impl ShirtInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CostResult<()> {
        self.common.validate()?;
        ensure_non_negative("shirt_body_length", self.shirt_body_length)?;
        ensure_non_negative("shirt_sleeve_length", self.shirt_sleeve_length)?;
        ensure_non_negative("shirt_chest_width", self.shirt_chest_width)?;
        ensure_non_negative("shirt_collar", self.shirt_collar)?;
        ensure_non_negative("fabric_width", self.fabric_width)?;
        ensure_non_negative("shirt_wastage_percent", self.shirt_wastage_percent)?;
        ensure_non_negative("shirt_fabric_allowance", self.shirt_fabric_allowance)?;
        ensure_non_negative("fabric_price_per_yard", self.fabric_price_per_yard)
    }

    /// Body plus sleeve, each with its allowance
    pub fn total_length(&self) -> Inches {
        let allowance = Inches(self.shirt_fabric_allowance);
        (Inches(self.shirt_body_length) + allowance) + (Inches(self.shirt_sleeve_length) + allowance)
    }
}

/// Results from a woven (shirt or denim) calculation.
///
/// Yardage per piece is rounded to 3 decimals, per dozen and money to 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WovenBreakdown {
    /// Human label for the garment family
    pub garment_type: String,

    /// Length the yardage is based on, allowances included (in)
    pub total_length_in: f64,

    /// Mean of front and back rise (denim only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rise_in: Option<f64>,

    /// Fabric per piece before wastage (yd)
    pub yards_per_piece: f64,

    /// Fabric per piece including wastage (yd)
    pub yards_with_wastage: f64,

    /// Fabric per dozen including wastage (yd)
    pub yards_per_doz: f64,

    /// Fabric cost per piece (USD)
    pub fabric_cost_per_pc: f64,

    /// Sum of the per-piece add-ons (USD)
    pub piece_costs_per_pc: f64,

    /// Total cost per piece before margin (USD)
    pub total_cost_per_pc: f64,

    /// Quoted FOB price per piece (USD)
    pub final_fob_per_pc: f64,
}

/// Yardage and pricing steps common to every woven garment.
pub(crate) fn woven_breakdown(
    garment: GarmentType,
    total_length: Inches,
    average_rise: Option<Inches>,
    wastage_percent: f64,
    price_per_yard: f64,
    common: &CommonInputs,
) -> WovenBreakdown {
    let yards_per_piece = Yards::from(total_length) + Yards(TRIM_ALLOWANCE_YARDS);
    let yards_with_wastage = Yards(apply_percent(yards_per_piece.value(), wastage_percent));
    let yards_per_doz = Yards(per_dozen(yards_with_wastage.value()));
    let fabric_cost_per_pc = yards_with_wastage.value() * price_per_yard;

    let pricing = price_from_fabric_cost(fabric_cost_per_pc, common);

    WovenBreakdown {
        garment_type: garment.label().to_string(),
        total_length_in: round_to(total_length.value(), 2),
        average_rise_in: average_rise.map(|rise| round_to(rise.value(), 2)),
        yards_per_piece: round_to(yards_per_piece.value(), 3),
        yards_with_wastage: round_to(yards_with_wastage.value(), 3),
        yards_per_doz: round_to(yards_per_doz.value(), 2),
        fabric_cost_per_pc: round_to(fabric_cost_per_pc, 2),
        piece_costs_per_pc: round_to(pricing.piece_costs_per_pc, 2),
        total_cost_per_pc: round_to(pricing.total_cost_per_pc, 2),
        final_fob_per_pc: round_to(pricing.final_fob_per_pc, 2),
    }
}

/// Calculate the woven shirt cost breakdown.
pub fn calculate(input: &ShirtInput) -> CostResult<WovenBreakdown> {
    input.validate()?;

    Ok(woven_breakdown(
        GarmentType::Shirt,
        input.total_length(),
        None,
        input.shirt_wastage_percent,
        input.fabric_price_per_yard,
        &input.common,
    ))
}
