//! Stored cost sheets and their list-view summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::{CostBreakdown, CostInput};

/// One saved calculation: the inputs as entered and the breakdown they
/// produced.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "1760608800123",
///   "timestamp": "2026-10-16T10:00:00.123Z",
///   "inputs": { "garment_type": "shirt", "style_name": "OX-22", "...": "..." },
///   "breakdown": { "garment_type": "Woven Shirt", "final_fob_per_pc": 7.56, "...": "..." }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSheetRecord {
    /// Creation time in Unix milliseconds, unique within a log
    pub id: String,

    /// When the sheet was saved (RFC 3339 / ISO-8601, UTC)
    pub timestamp: DateTime<Utc>,

    /// Inputs as passed to the engine
    pub inputs: CostInput,

    /// Breakdown the engine returned
    pub breakdown: CostBreakdown,
}

impl CostSheetRecord {
    /// Row for a history list view
    pub fn summary(&self) -> CostSheetSummary {
        let common = self.inputs.common();
        let (consumption_per_doz, consumption_unit) = self.breakdown.consumption_per_doz();
        let knit = match &self.inputs {
            CostInput::TShirt(input) => Some(input),
            _ => None,
        };

        CostSheetSummary {
            id: self.id.clone(),
            timestamp: self.timestamp,
            style_name: common.style_name.clone(),
            buyer_name: common.buyer_name.clone(),
            season: common.season.clone(),
            garment_type: self.breakdown.garment_label().to_string(),
            fabric_type: knit.and_then(|input| input.fabric_type.clone()),
            gsm: knit.map(|input| input.gsm),
            final_fob_per_pc: self.breakdown.final_fob_per_pc(),
            consumption_per_doz,
            consumption_unit: consumption_unit.to_string(),
        }
    }
}

/// Summary of a stored cost sheet for list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSheetSummary {
    /// Record id
    pub id: String,

    /// When the sheet was saved
    pub timestamp: DateTime<Utc>,

    /// Style identity as entered
    pub style_name: String,
    pub buyer_name: String,
    pub season: String,

    /// Garment label, e.g. "Woven Shirt"
    pub garment_type: String,

    /// Knit fabric description (t-shirts only, when entered)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabric_type: Option<String>,

    /// Knit fabric weight (t-shirts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gsm: Option<f64>,

    /// Quoted FOB per piece (USD)
    pub final_fob_per_pc: f64,

    /// Fabric required per dozen, in `consumption_unit`
    pub consumption_per_doz: f64,

    /// "kg/doz" for knit, "yd/doz" for woven
    pub consumption_unit: String,
}
