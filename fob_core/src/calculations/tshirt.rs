//! # T-Shirt (Knit) Calculation
//!
//! Estimates knit fabric consumption in kilograms per dozen from body
//! measurements and fabric weight, then prices the garment per piece.
//!
//! ## Method
//!
//! ```text
//! length = body + sleeve + allowance                      (cm)
//! width  = chest + allowance * 0.75                       (cm)
//! basic  = length * width * 2 panels * GSM * 12 / 10^7    (kg/doz)
//! total  = basic * (1 + wastage%)                         (kg/doz)
//! fabric = (yarn + knitting + dyeing) * total / 12        ($/pc)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fob_core::calculations::tshirt::{calculate, TShirtInput};
//! use fob_core::calculations::pricing::CommonInputs;
//!
//! let input = TShirtInput {
//!     common: CommonInputs {
//!         style_name: "Style-001".to_string(),
//!         profit_margin_percent: 15.0,
//!         ..CommonInputs::default()
//!     },
//!     fabric_type: Some("Single Jersey".to_string()),
//!     body_length: 72.0,
//!     sleeve_length: 24.0,
//!     chest_width: 54.0,
//!     gsm: 160.0,
//!     wastage_percent: 10.0,
//!     fabric_allowance: 4.0,
//!     yarn_price_per_kg: 4.5,
//!     knitting_charge_per_kg: 0.5,
//!     dyeing_charge_per_kg: 1.2,
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.basic_consumption_kg_doz, 2.1888);
//! ```

use serde::{Deserialize, Serialize};

use super::pricing::{ensure_non_negative, ensure_positive, price_from_fabric_cost, CommonInputs};
use super::GarmentType;
use crate::errors::CostResult;
use crate::units::{apply_percent, per_piece, round_to, Centimeters, Kilograms, PIECES_PER_DOZEN};

/// Front and back body panels
const PANELS: f64 = 2.0;

/// cm² x g/m² -> kg
const CM2_GSM_TO_KG: f64 = 10_000_000.0;

/// Share of the allowance added across the chest
const WIDTH_ALLOWANCE_FACTOR: f64 = 0.75;

fn default_fabric_allowance() -> f64 {
    4.0
}

/// Input parameters for a knit t-shirt.
///
/// ## JSON Example
///
/// ```json
/// {
///   "garment_type": "tshirt",
///   "style_name": "Style-001",
///   "buyer_name": "Buyer-A",
///   "season": "Summer 24",
///   "fabric_type": "Single Jersey",
///   "body_length": 72,
///   "sleeve_length": 24,
///   "chest_width": 54,
///   "gsm": 160,
///   "wastage_percent": 10,
///   "fabric_allowance": 4,
///   "yarn_price_per_kg": 4.5,
///   "knitting_charge_per_kg": 0.5,
///   "dyeing_charge_per_kg": 1.2,
///   "cm_cost_per_pc": 1.0,
///   "profit_margin_percent": 15
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TShirtInput {
    /// Style identity, margin and per-piece add-ons
    #[serde(flatten)]
    pub common: CommonInputs,

    /// Descriptive fabric name (e.g., "Single Jersey"); not used in the math
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric_type: Option<String>,

    /// Body length in cm
    pub body_length: f64,

    /// Sleeve length in cm
    pub sleeve_length: f64,

    /// Half chest width in cm
    pub chest_width: f64,

    /// Fabric weight in grams per square meter
    pub gsm: f64,

    /// Cutting and process wastage in percent
    pub wastage_percent: f64,

    /// Seam allowance in cm
    #[serde(default = "default_fabric_allowance")]
    pub fabric_allowance: f64,

    /// Yarn price in USD/kg
    pub yarn_price_per_kg: f64,

    /// Knitting charge in USD/kg
    pub knitting_charge_per_kg: f64,

    /// Dyeing charge in USD/kg
    pub dyeing_charge_per_kg: f64,
}

impl TShirtInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CostResult<()> {
        self.common.validate()?;
        ensure_non_negative("body_length", self.body_length)?;
        ensure_non_negative("sleeve_length", self.sleeve_length)?;
        ensure_non_negative("chest_width", self.chest_width)?;
        ensure_positive("gsm", self.gsm)?;
        ensure_non_negative("wastage_percent", self.wastage_percent)?;
        ensure_non_negative("fabric_allowance", self.fabric_allowance)?;
        ensure_non_negative("yarn_price_per_kg", self.yarn_price_per_kg)?;
        ensure_non_negative("knitting_charge_per_kg", self.knitting_charge_per_kg)?;
        ensure_non_negative("dyeing_charge_per_kg", self.dyeing_charge_per_kg)
    }

    /// Cut length including allowance
    pub fn length(&self) -> Centimeters {
        Centimeters(self.body_length) + Centimeters(self.sleeve_length) + Centimeters(self.fabric_allowance)
    }

    /// Cut width including allowance
    pub fn width(&self) -> Centimeters {
        Centimeters(self.chest_width) + Centimeters(self.fabric_allowance) * WIDTH_ALLOWANCE_FACTOR
    }

    /// Combined fabric rate: yarn + knitting + dyeing (USD/kg)
    pub fn fabric_rate_per_kg(&self) -> f64 {
        self.yarn_price_per_kg + self.knitting_charge_per_kg + self.dyeing_charge_per_kg
    }
}

/// Results from a knit t-shirt calculation.
///
/// Consumption figures are rounded to 4 decimals, money to 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnitBreakdown {
    /// Human label for the garment family
    pub garment_type: String,

    /// Cut length including allowance (cm)
    pub length_cm: f64,

    /// Cut width including allowance (cm)
    pub width_cm: f64,

    /// Fabric for a dozen pieces before wastage (kg/doz)
    pub basic_consumption_kg_doz: f64,

    /// Fabric for a dozen pieces including wastage (kg/doz)
    pub total_fabric_req_kg_doz: f64,

    /// Yarn + knitting + dyeing (USD/kg)
    pub fabric_rate_per_kg: f64,

    /// Fabric cost per dozen (USD)
    pub fabric_cost_per_doz: f64,

    /// Fabric cost per piece (USD)
    pub fabric_cost_per_pc: f64,

    /// Sum of the per-piece add-ons (USD)
    pub piece_costs_per_pc: f64,

    /// Total cost per piece before margin (USD)
    pub total_cost_per_pc: f64,

    /// Quoted FOB price per piece (USD)
    pub final_fob_per_pc: f64,
}

/// Calculate the knit t-shirt cost breakdown.
///
/// # Returns
///
/// * `Ok(KnitBreakdown)` - Rounded breakdown
/// * `Err(CostError::InvalidInput)` - If a field is negative, non-finite, or GSM is zero
pub fn calculate(input: &TShirtInput) -> CostResult<KnitBreakdown> {
    input.validate()?;

    let length = input.length();
    let width = input.width();

    let basic_consumption =
        Kilograms(length.value() * width.value() * PANELS * input.gsm * PIECES_PER_DOZEN / CM2_GSM_TO_KG);
    let total_fabric_req = Kilograms(apply_percent(basic_consumption.value(), input.wastage_percent));

    let fabric_rate_per_kg = input.fabric_rate_per_kg();
    let fabric_cost_per_doz = fabric_rate_per_kg * total_fabric_req.value();
    let fabric_cost_per_pc = per_piece(fabric_cost_per_doz);

    let pricing = price_from_fabric_cost(fabric_cost_per_pc, &input.common);

    Ok(KnitBreakdown {
        garment_type: GarmentType::TShirt.label().to_string(),
        length_cm: round_to(length.value(), 2),
        width_cm: round_to(width.value(), 2),
        basic_consumption_kg_doz: round_to(basic_consumption.value(), 4),
        total_fabric_req_kg_doz: round_to(total_fabric_req.value(), 4),
        fabric_rate_per_kg: round_to(fabric_rate_per_kg, 2),
        fabric_cost_per_doz: round_to(fabric_cost_per_doz, 2),
        fabric_cost_per_pc: round_to(fabric_cost_per_pc, 2),
        piece_costs_per_pc: round_to(pricing.piece_costs_per_pc, 2),
        total_cost_per_pc: round_to(pricing.total_cost_per_pc, 2),
        final_fob_per_pc: round_to(pricing.final_fob_per_pc, 2),
    })
}
