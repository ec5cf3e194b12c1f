//! # Costing Calculations
//!
//! This module contains one calculator per garment family. Each follows the
//! pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Breakdown` - Rounded results (JSON-serializable)
//! - `calculate(input) -> CostResult<*Breakdown>` - Pure calculation function
//!
//! [`compute`] is the single entry point: it dispatches a [`CostInput`] to
//! the calculator for its garment family.
//!
//! ## Available Calculations
//!
//! - [`tshirt`] - Knit t-shirt, consumption in kg/doz
//! - [`shirt`] - Woven shirt, consumption in yards
//! - [`jeans`] - Denim jeans, consumption in yards
//!
//! ## Example
//!
//! ```rust
//! use fob_core::calculations::{compute, CostInput};
//!
//! let input: CostInput = serde_json::from_str(r#"{
//!     "garment_type": "shirt",
//!     "style_name": "OX-22",
//!     "shirt_body_length": 30, "shirt_sleeve_length": 25,
//!     "shirt_chest_width": 22, "shirt_collar": 15.5, "fabric_width": 58,
//!     "shirt_wastage_percent": 5, "fabric_price_per_yard": 3.5,
//!     "profit_margin_percent": 15
//! }"#).unwrap();
//!
//! let breakdown = compute(&input).unwrap();
//! assert_eq!(breakdown.final_fob_per_pc(), 7.56);
//! ```

pub mod jeans;
pub mod pricing;
pub mod shirt;
pub mod tshirt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CostResult;

// Re-export commonly used types
pub use jeans::JeansInput;
pub use pricing::{CommonInputs, PieceCosts};
pub use shirt::{ShirtInput, WovenBreakdown};
pub use tshirt::{KnitBreakdown, TShirtInput};

/// Garment family, used as the `garment_type` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentType {
    /// Knit t-shirt
    #[serde(rename = "tshirt")]
    TShirt,
    /// Woven shirt
    Shirt,
    /// Denim jeans
    Jeans,
}

impl GarmentType {
    /// Wire tag used in `garment_type`
    pub fn tag(&self) -> &'static str {
        match self {
            GarmentType::TShirt => "tshirt",
            GarmentType::Shirt => "shirt",
            GarmentType::Jeans => "jeans",
        }
    }

    /// Human label shown in breakdowns
    pub fn label(&self) -> &'static str {
        match self {
            GarmentType::TShirt => "T-Shirt (Knit)",
            GarmentType::Shirt => "Woven Shirt",
            GarmentType::Jeans => "Denim Jeans",
        }
    }

    /// Parse a `garment_type` tag. Absent or unrecognized tags fall back to
    /// [`GarmentType::TShirt`].
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("tshirt") => GarmentType::TShirt,
            Some("shirt") => GarmentType::Shirt,
            Some("jeans") => GarmentType::Jeans,
            other => {
                debug!(garment_type = ?other, "unrecognized garment type, using tshirt");
                GarmentType::TShirt
            }
        }
    }
}

impl std::fmt::Display for GarmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Costing input for any garment family.
///
/// Serializes as one flat JSON object carrying a `garment_type` tag next to
/// the common and garment-specific fields. Deserialization is lenient on the
/// tag: a missing or unknown `garment_type` reads the record as a t-shirt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "garment_type")]
pub enum CostInput {
    #[serde(rename = "tshirt")]
    TShirt(TShirtInput),
    #[serde(rename = "shirt")]
    Shirt(ShirtInput),
    #[serde(rename = "jeans")]
    Jeans(JeansInput),
}

impl<'de> Deserialize<'de> for CostInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value.get("garment_type").and_then(|v| v.as_str());

        let parsed = match GarmentType::from_tag(tag) {
            GarmentType::TShirt => serde_json::from_value(value).map(CostInput::TShirt),
            GarmentType::Shirt => serde_json::from_value(value).map(CostInput::Shirt),
            GarmentType::Jeans => serde_json::from_value(value).map(CostInput::Jeans),
        };
        parsed.map_err(de::Error::custom)
    }
}

impl CostInput {
    /// Garment family of this input
    pub fn garment_type(&self) -> GarmentType {
        match self {
            CostInput::TShirt(_) => GarmentType::TShirt,
            CostInput::Shirt(_) => GarmentType::Shirt,
            CostInput::Jeans(_) => GarmentType::Jeans,
        }
    }

    /// Style identity, margin and add-ons
    pub fn common(&self) -> &CommonInputs {
        match self {
            CostInput::TShirt(i) => &i.common,
            CostInput::Shirt(i) => &i.common,
            CostInput::Jeans(i) => &i.common,
        }
    }

    /// Validate all fields of the selected garment family.
    pub fn validate(&self) -> CostResult<()> {
        match self {
            CostInput::TShirt(i) => i.validate(),
            CostInput::Shirt(i) => i.validate(),
            CostInput::Jeans(i) => i.validate(),
        }
    }
}

/// Cost breakdown for any garment family.
///
/// Serialized untagged: knit and woven breakdowns have disjoint consumption
/// fields, so stored records read back into the right shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostBreakdown {
    /// T-shirt breakdown (kg/doz)
    Knit(KnitBreakdown),
    /// Shirt or jeans breakdown (yards)
    Woven(WovenBreakdown),
}

impl CostBreakdown {
    /// Human label of the garment family
    pub fn garment_label(&self) -> &str {
        match self {
            CostBreakdown::Knit(b) => &b.garment_type,
            CostBreakdown::Woven(b) => &b.garment_type,
        }
    }

    /// Fabric cost per piece (USD)
    pub fn fabric_cost_per_pc(&self) -> f64 {
        match self {
            CostBreakdown::Knit(b) => b.fabric_cost_per_pc,
            CostBreakdown::Woven(b) => b.fabric_cost_per_pc,
        }
    }

    /// Total cost per piece before margin (USD)
    pub fn total_cost_per_pc(&self) -> f64 {
        match self {
            CostBreakdown::Knit(b) => b.total_cost_per_pc,
            CostBreakdown::Woven(b) => b.total_cost_per_pc,
        }
    }

    /// Quoted FOB price per piece (USD)
    pub fn final_fob_per_pc(&self) -> f64 {
        match self {
            CostBreakdown::Knit(b) => b.final_fob_per_pc,
            CostBreakdown::Woven(b) => b.final_fob_per_pc,
        }
    }

    /// Fabric required per dozen with its unit: kg for knit, yards for woven.
    pub fn consumption_per_doz(&self) -> (f64, &'static str) {
        match self {
            CostBreakdown::Knit(b) => (b.total_fabric_req_kg_doz, "kg/doz"),
            CostBreakdown::Woven(b) => (b.yards_per_doz, "yd/doz"),
        }
    }
}

/// Compute the cost breakdown for any garment family.
///
/// # Returns
///
/// * `Ok(CostBreakdown)` - Rounded breakdown from the matching calculator
/// * `Err(CostError::InvalidInput)` - If a numeric field is negative or non-finite
pub fn compute(input: &CostInput) -> CostResult<CostBreakdown> {
    let breakdown = match input {
        CostInput::TShirt(i) => CostBreakdown::Knit(tshirt::calculate(i)?),
        CostInput::Shirt(i) => CostBreakdown::Woven(shirt::calculate(i)?),
        CostInput::Jeans(i) => CostBreakdown::Woven(jeans::calculate(i)?),
    };

    debug!(
        garment_type = input.garment_type().tag(),
        style = %input.common().style_name,
        final_fob_per_pc = breakdown.final_fob_per_pc(),
        "computed cost breakdown"
    );
    Ok(breakdown)
}
