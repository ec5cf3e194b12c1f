//! # Shared Pricing Tail
//!
//! Every garment family ends the same way once its fabric cost per piece is
//! known:
//!
//! ```text
//! fabric_cost_per_pc -> + per-piece add-ons -> x (1 + margin%) -> final FOB
//! ```
//!
//! The inputs that feed this tail are common to every garment and are
//! flattened into each garment's JSON record.

use serde::{Deserialize, Serialize};

use crate::errors::{CostError, CostResult};
use crate::units::apply_percent;

/// Per-piece cost add-ons in USD. Absent fields default to zero.
///
/// ## JSON Example
///
/// ```json
/// {
///   "aop_print_cost_per_pc": 0.0,
///   "accessories_cost_per_pc": 0.17,
///   "cm_cost_per_pc": 1.0,
///   "washing_cost_per_pc": 0.5,
///   "commercial_cost_per_pc": 0.8,
///   "testing_cost_per_pc": 0.3
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceCosts {
    /// All-over print cost
    pub aop_print_cost_per_pc: f64,

    /// Trims, labels, buttons, zippers, packing
    pub accessories_cost_per_pc: f64,

    /// Cut-and-make labor
    pub cm_cost_per_pc: f64,

    /// Garment wash
    pub washing_cost_per_pc: f64,

    /// Commercial overhead (banking, documentation, inspection)
    pub commercial_cost_per_pc: f64,

    /// Lab testing
    pub testing_cost_per_pc: f64,
}

impl PieceCosts {
    /// Sum of all six add-ons.
    pub fn total(&self) -> f64 {
        self.aop_print_cost_per_pc
            + self.accessories_cost_per_pc
            + self.cm_cost_per_pc
            + self.washing_cost_per_pc
            + self.commercial_cost_per_pc
            + self.testing_cost_per_pc
    }

    /// Validate that every add-on is finite and non-negative.
    pub fn validate(&self) -> CostResult<()> {
        ensure_non_negative("aop_print_cost_per_pc", self.aop_print_cost_per_pc)?;
        ensure_non_negative("accessories_cost_per_pc", self.accessories_cost_per_pc)?;
        ensure_non_negative("cm_cost_per_pc", self.cm_cost_per_pc)?;
        ensure_non_negative("washing_cost_per_pc", self.washing_cost_per_pc)?;
        ensure_non_negative("commercial_cost_per_pc", self.commercial_cost_per_pc)?;
        ensure_non_negative("testing_cost_per_pc", self.testing_cost_per_pc)
    }
}

/// Fields shared by every garment family: style identity, margin, add-ons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonInputs {
    /// Style reference (e.g., "Style-001")
    #[serde(default)]
    pub style_name: String,

    /// Buyer the quote is for
    #[serde(default)]
    pub buyer_name: String,

    /// Selling season (e.g., "Summer 24")
    #[serde(default)]
    pub season: String,

    /// Profit margin applied on top of total cost, in percent
    pub profit_margin_percent: f64,

    /// Per-piece add-ons
    #[serde(flatten)]
    pub piece_costs: PieceCosts,
}

impl CommonInputs {
    /// Validate margin and add-ons.
    pub fn validate(&self) -> CostResult<()> {
        ensure_non_negative("profit_margin_percent", self.profit_margin_percent)?;
        self.piece_costs.validate()
    }
}

/// Unrounded output of the shared tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    /// Sum of the per-piece add-ons
    pub piece_costs_per_pc: f64,

    /// Fabric plus add-ons, before margin
    pub total_cost_per_pc: f64,

    /// Total cost with margin applied
    pub final_fob_per_pc: f64,
}

/// Run the shared tail on a garment's fabric cost per piece.
pub fn price_from_fabric_cost(fabric_cost_per_pc: f64, common: &CommonInputs) -> Pricing {
    let piece_costs_per_pc = common.piece_costs.total();
    let total_cost_per_pc = fabric_cost_per_pc + piece_costs_per_pc;
    let final_fob_per_pc = apply_percent(total_cost_per_pc, common.profit_margin_percent);

    Pricing {
        piece_costs_per_pc,
        total_cost_per_pc,
        final_fob_per_pc,
    }
}

/// Reject NaN, infinities and negative values for a named field.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> CostResult<()> {
    if !value.is_finite() {
        return Err(CostError::invalid_input(
            field,
            value.to_string(),
            "Value must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(CostError::invalid_input(
            field,
            value.to_string(),
            "Value cannot be negative",
        ));
    }
    Ok(())
}

/// Reject anything that is not a finite, strictly positive value.
pub(crate) fn ensure_positive(field: &str, value: f64) -> CostResult<()> {
    ensure_non_negative(field, value)?;
    if value == 0.0 {
        return Err(CostError::invalid_input(
            field,
            value.to_string(),
            "Value must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_common(margin: f64) -> CommonInputs {
        CommonInputs {
            style_name: "Style-001".to_string(),
            buyer_name: "Buyer-A".to_string(),
            season: "Summer 24".to_string(),
            profit_margin_percent: margin,
            piece_costs: PieceCosts {
                aop_print_cost_per_pc: 0.0,
                accessories_cost_per_pc: 0.17,
                cm_cost_per_pc: 1.0,
                washing_cost_per_pc: 0.5,
                commercial_cost_per_pc: 0.8,
                testing_cost_per_pc: 0.3,
            },
        }
    }

    #[test]
    fn test_piece_costs_total() {
        let common = test_common(15.0);
        assert!((common.piece_costs.total() - 2.77).abs() < 1e-9);
    }

    #[test]
    fn test_price_from_fabric_cost() {
        let pricing = price_from_fabric_cost(12.43968, &test_common(15.0));
        assert!((pricing.total_cost_per_pc - 15.20968).abs() < 1e-9);
        assert!((pricing.final_fob_per_pc - 17.491132).abs() < 1e-9);
    }

    #[test]
    fn test_zero_margin_is_identity() {
        let pricing = price_from_fabric_cost(5.0, &test_common(0.0));
        assert_eq!(pricing.final_fob_per_pc, pricing.total_cost_per_pc);
    }

    #[test]
    fn test_missing_piece_costs_default_to_zero() {
        let json = r#"{ "style_name": "S-1", "profit_margin_percent": 10 }"#;
        let common: CommonInputs = serde_json::from_str(json).unwrap();
        assert_eq!(common.piece_costs, PieceCosts::default());
        assert_eq!(common.piece_costs.total(), 0.0);
        assert_eq!(common.buyer_name, "");
    }

    #[test]
    fn test_negative_add_on_rejected() {
        let mut common = test_common(15.0);
        common.piece_costs.cm_cost_per_pc = -1.0;
        let err = common.validate().unwrap_err();
        match err {
            CostError::InvalidInput { field, .. } => assert_eq!(field, "cm_cost_per_pc"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(ensure_non_negative("gsm", f64::NAN).is_err());
        assert!(ensure_non_negative("gsm", f64::INFINITY).is_err());
        assert!(ensure_positive("gsm", 0.0).is_err());
        assert!(ensure_positive("gsm", 160.0).is_ok());
    }
}
