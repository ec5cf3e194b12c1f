//! # fob_core - Garment FOB Costing Engine
//!
//! `fob_core` turns garment measurements and unit costs into a fabric
//! consumption and Free-On-Board price breakdown, and keeps a capped history
//! of saved cost sheets. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless engine**: pure functions from input to breakdown
//! - **JSON-First**: all records implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Tagged inputs**: one input type per garment family, so fields of
//!   different families cannot be mixed
//!
//! ## Quick Start
//!
//! ```rust
//! use fob_core::{compute, CostInput, HistoryStore, MemoryBlobStore};
//!
//! let input: CostInput = serde_json::from_str(r#"{
//!     "garment_type": "tshirt",
//!     "style_name": "Style-001",
//!     "body_length": 72, "sleeve_length": 24, "chest_width": 54,
//!     "gsm": 160, "wastage_percent": 10,
//!     "yarn_price_per_kg": 4.5, "knitting_charge_per_kg": 0.5, "dyeing_charge_per_kg": 1.2,
//!     "cm_cost_per_pc": 1.0,
//!     "profit_margin_percent": 15
//! }"#).unwrap();
//!
//! let breakdown = compute(&input).unwrap();
//! let history = HistoryStore::new(MemoryBlobStore::new());
//! history.append(input, breakdown).unwrap();
//! assert_eq!(history.list().len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Garment inputs, calculators and the dispatcher
//! - [`history`] - Capped cost sheet log over a key-value blob store
//! - [`units`] - Unit wrappers and rounding helpers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod history;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute, CostBreakdown, CostInput, GarmentType};
pub use errors::{CostError, CostResult};
pub use history::{
    BlobStore, CostSheetRecord, CostSheetSummary, FileBlobStore, HistoryStore, MemoryBlobStore,
};
