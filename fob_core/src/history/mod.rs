//! # Cost Sheet History
//!
//! A capped, most-recent-first log of saved calculations. The whole log is
//! one JSON array stored under [`HISTORY_KEY`] in a [`BlobStore`]:
//!
//! - `append` reads the array, prepends the new record, keeps the first
//!   [`HISTORY_CAPACITY`] entries and writes the array back
//! - `list` returns the entries that parse as [`CostSheetRecord`], or an
//!   empty log if the key is absent or the stored value is unreadable
//!
//! Records are never edited or deleted individually; the oldest fall off the
//! end when the log is full. Entries this version cannot parse (for example
//! cost sheets saved in an older layout) are skipped by `list` but carried
//! through `append` untouched. If the stored value cannot be read at all,
//! `append` fails and writes nothing.
//!
//! All operations block on the underlying store. Appends are
//! read-modify-write with no locking, so two concurrent appends race and the
//! last write wins.
//!
//! ## Example
//!
//! ```rust
//! use fob_core::calculations::{compute, CostInput};
//! use fob_core::history::{HistoryStore, MemoryBlobStore};
//!
//! let input: CostInput = serde_json::from_str(r#"{
//!     "garment_type": "jeans", "style_name": "DNM-5P",
//!     "waist": 32, "inseam": 32, "thigh_width": 12,
//!     "front_rise": 11, "back_rise": 15, "leg_opening": 7.5,
//!     "denim_fabric_width": 58, "jeans_wastage_percent": 8,
//!     "fabric_price_per_yard": 4.0, "profit_margin_percent": 10
//! }"#).unwrap();
//! let breakdown = compute(&input).unwrap();
//!
//! let history = HistoryStore::new(MemoryBlobStore::new());
//! let record = history.append(input, breakdown).unwrap();
//!
//! assert_eq!(history.list()[0].id, record.id);
//! ```

pub mod blob;
pub mod record;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::calculations::{CostBreakdown, CostInput};
use crate::errors::{CostError, CostResult};

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use record::{CostSheetRecord, CostSheetSummary};

/// Storage key holding the serialized log
pub const HISTORY_KEY: &str = "cost_sheets_history";

/// Maximum number of records kept
pub const HISTORY_CAPACITY: usize = 50;

/// Capped cost sheet log over a key-value blob store.
pub struct HistoryStore<S> {
    store: S,
}

impl<S: BlobStore> HistoryStore<S> {
    /// Wrap a blob store.
    pub fn new(store: S) -> Self {
        HistoryStore { store }
    }

    /// Save a calculation at the head of the log.
    ///
    /// Stored entries are kept as they are, including ones that do not parse
    /// as records; only the 50-entry cap evicts anything.
    ///
    /// # Returns
    ///
    /// * `Ok(CostSheetRecord)` - The record as stored
    /// * `Err(CostError::StorageError)` - The log could not be read or written; nothing was saved
    /// * `Err(CostError::SerializationError)` - The stored value is not a JSON array; nothing was saved
    pub fn append(&self, inputs: CostInput, breakdown: CostBreakdown) -> CostResult<CostSheetRecord> {
        let mut entries = self.read_entries()?;

        let now = Utc::now();
        let newest_id = entries.first().and_then(|entry| entry.get("id")).and_then(Value::as_str);
        let record = CostSheetRecord {
            id: next_id(now, newest_id),
            timestamp: now,
            inputs,
            breakdown,
        };

        entries.insert(0, serde_json::to_value(&record)?);
        let evicted = entries.len().saturating_sub(HISTORY_CAPACITY);
        entries.truncate(HISTORY_CAPACITY);

        let json = serde_json::to_string(&entries)?;
        self.store.set(HISTORY_KEY, &json)?;

        info!(
            id = %record.id,
            style = %record.inputs.common().style_name,
            entries = entries.len(),
            evicted,
            "saved cost sheet"
        );
        Ok(record)
    }

    /// All stored records, most recent first.
    ///
    /// Entries that do not parse are skipped. Returns an empty log when
    /// nothing is stored or the stored value cannot be read or parsed.
    pub fn list(&self) -> Vec<CostSheetRecord> {
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "failed to load cost sheet history");
                return Vec::new();
            }
        };

        entries
            .iter()
            .filter_map(|entry| match CostSheetRecord::deserialize(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(id = ?entry.get("id"), error = %e, "skipping unreadable cost sheet");
                    None
                }
            })
            .collect()
    }

    /// Look up one stored record by id.
    pub fn get(&self, id: &str) -> Option<CostSheetRecord> {
        self.list().into_iter().find(|record| record.id == id)
    }

    /// Look up one stored record by id, failing with `RecordNotFound`.
    pub fn require(&self, id: &str) -> CostResult<CostSheetRecord> {
        self.get(id).ok_or_else(|| CostError::record_not_found(id))
    }

    /// List-view rows for all stored records, most recent first.
    pub fn summaries(&self) -> Vec<CostSheetSummary> {
        self.list().iter().map(CostSheetRecord::summary).collect()
    }

    /// Raw stored entries; an absent key is an empty log.
    fn read_entries(&self) -> CostResult<Vec<Value>> {
        match self.store.get(HISTORY_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}

/// Millisecond timestamp id, bumped past the newest stored id so ids stay
/// unique and increasing when saves land in the same millisecond.
fn next_id(now: DateTime<Utc>, newest: Option<&str>) -> String {
    let millis = now.timestamp_millis();
    let newest_id = newest.and_then(|id| id.parse::<i64>().ok());

    match newest_id {
        Some(newest_id) if newest_id >= millis => (newest_id + 1).to_string(),
        _ => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::compute;
    use std::cell::Cell;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn test_input(style_name: &str) -> CostInput {
        let json = format!(
            r#"{{
                "garment_type": "shirt", "style_name": "{style_name}", "buyer_name": "Buyer-B",
                "shirt_body_length": 30, "shirt_sleeve_length": 25,
                "shirt_chest_width": 22, "shirt_collar": 15.5, "fabric_width": 58,
                "shirt_wastage_percent": 5, "fabric_price_per_yard": 3.5,
                "profit_margin_percent": 15
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn append_style(history: &HistoryStore<impl BlobStore>, style_name: &str) -> CostSheetRecord {
        let input = test_input(style_name);
        let breakdown = compute(&input).unwrap();
        history.append(input, breakdown).unwrap()
    }

    /// Store whose reads and writes always fail.
    struct BrokenStore;

    impl BlobStore for BrokenStore {
        fn get(&self, key: &str) -> CostResult<Option<String>> {
            Err(CostError::storage_error("read", key, "device unavailable"))
        }

        fn set(&self, key: &str, _value: &str) -> CostResult<()> {
            Err(CostError::storage_error("write", key, "device unavailable"))
        }
    }

    /// Memory store whose next read fails once.
    struct FlakyStore {
        inner: MemoryBlobStore,
        fail_next_read: Cell<bool>,
    }

    impl BlobStore for FlakyStore {
        fn get(&self, key: &str) -> CostResult<Option<String>> {
            if self.fail_next_read.replace(false) {
                return Err(CostError::storage_error("read", key, "interrupted"));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> CostResult<()> {
            self.inner.set(key, value)
        }
    }

    /// A cost sheet as the earlier mobile app saved it: per-dozen add-ons in
    /// the inputs and a per-dozen breakdown without a garment label.
    const OLD_LAYOUT_ENTRY: &str = r#"{
        "id": "1718000000000",
        "timestamp": "2024-06-10T06:13:20.000Z",
        "inputs": {
            "style_name": "Style-001", "buyer_name": "Buyer-A", "season": "Summer 24",
            "fabric_type": "Single Jersey", "gsm": 160,
            "body_length": 70, "sleeve_length": 22, "chest_width": 52,
            "wastage_percent": 10, "yarn_price_per_kg": 4.5,
            "knitting_charge_per_kg": 0.5, "dyeing_charge_per_kg": 1.2,
            "aop_print_cost_per_doz": 0, "accessories_cost_per_doz": 2,
            "cm_cost_per_doz": 12, "commercial_cost_percent": 5,
            "profit_margin_percent": 15
        },
        "breakdown": {
            "basic_consumption_kg_doz": 2.0064,
            "total_fabric_req_kg_doz": 2.207,
            "fabric_cost_per_doz": 13.68,
            "total_cost_per_doz": 27.68,
            "cost_with_commercial_per_doz": 29.07,
            "final_fob_per_pc": 2.79
        }
    }"#;

    fn raw_entries(store: &MemoryBlobStore) -> Vec<serde_json::Value> {
        let raw = store.get(HISTORY_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_empty_when_key_absent() {
        let history = HistoryStore::new(MemoryBlobStore::new());
        assert!(history.list().is_empty());
        assert!(history.summaries().is_empty());
    }

    #[test]
    fn test_empty_when_blob_malformed() {
        let store = MemoryBlobStore::new();
        store.set(HISTORY_KEY, "{not json").unwrap();

        let history = HistoryStore::new(&store);
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_empty_when_read_fails() {
        let history = HistoryStore::new(BrokenStore);
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_append_prepends() {
        let history = HistoryStore::new(MemoryBlobStore::new());
        let first = append_style(&history, "S-1");
        let second = append_style(&history, "S-2");

        let log = history.list();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], second);
        assert_eq!(log[1], first);
    }

    #[test]
    fn test_append_returns_stored_record() {
        let history = HistoryStore::new(MemoryBlobStore::new());
        let record = append_style(&history, "S-1");

        assert_eq!(record.inputs.common().style_name, "S-1");
        assert_eq!(record.breakdown.final_fob_per_pc(), 7.56);
        assert_eq!(history.get(&record.id), Some(record));
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let history = HistoryStore::new(MemoryBlobStore::new());
        let mut last = None;
        for n in 1..=60 {
            last = Some(append_style(&history, &format!("S-{n}")));
        }

        let log = history.list();
        assert_eq!(log.len(), HISTORY_CAPACITY);
        assert_eq!(Some(&log[0]), last.as_ref());
        assert_eq!(log[0].inputs.common().style_name, "S-60");
        // S-1 through S-10 were evicted
        assert_eq!(log[49].inputs.common().style_name, "S-11");
    }

    #[test]
    fn test_ids_unique_and_ordered() {
        let history = HistoryStore::new(MemoryBlobStore::new());
        for n in 0..20 {
            append_style(&history, &format!("S-{n}"));
        }

        let ids: Vec<i64> = history.list().iter().map(|r| r.id.parse().unwrap()).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_malformed_log_is_not_overwritten() {
        let store = MemoryBlobStore::new();
        store.set(HISTORY_KEY, "{not json").unwrap();

        let history = HistoryStore::new(&store);
        let input = test_input("S-1");
        let breakdown = compute(&input).unwrap();

        let err = history.append(input, breakdown).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_read_failure_keeps_existing_records() {
        let store = FlakyStore {
            inner: MemoryBlobStore::new(),
            fail_next_read: Cell::new(false),
        };
        let history = HistoryStore::new(&store);
        for n in 1..=30 {
            append_style(&history, &format!("S-{n}"));
        }

        store.fail_next_read.set(true);
        let input = test_input("S-31");
        let breakdown = compute(&input).unwrap();
        let err = history.append(input, breakdown).unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert_eq!(history.list().len(), 30);

        append_style(&history, "S-31");
        let log = history.list();
        assert_eq!(log.len(), 31);
        assert_eq!(log[0].inputs.common().style_name, "S-31");
        assert_eq!(log[30].inputs.common().style_name, "S-1");
    }

    #[test]
    fn test_read_failure_is_reported() {
        let history = HistoryStore::new(BrokenStore);
        let input = test_input("S-1");
        let breakdown = compute(&input).unwrap();

        let err = history.append(input, breakdown).unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // A regular file where the data directory should be
        let blocker = dir.path().join("not_a_dir");
        std::fs::File::create(&blocker).unwrap();

        let history = HistoryStore::new(FileBlobStore::new(&blocker));
        let input = test_input("S-1");
        let breakdown = compute(&input).unwrap();

        let err = history.append(input, breakdown).unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_old_layout_entry_is_skipped_not_dropped() {
        let store = MemoryBlobStore::new();
        let history = HistoryStore::new(&store);
        for n in 1..=10 {
            append_style(&history, &format!("S-{n}"));
        }

        let mut entries = raw_entries(&store);
        entries.push(serde_json::from_str(OLD_LAYOUT_ENTRY).unwrap());
        store.set(HISTORY_KEY, &serde_json::to_string(&entries).unwrap()).unwrap();

        assert_eq!(history.list().len(), 10);

        append_style(&history, "S-11");
        assert_eq!(history.list().len(), 11);

        let entries = raw_entries(&store);
        assert_eq!(entries.len(), 12);
        assert_eq!(entries[11]["id"], "1718000000000");
        assert_eq!(entries[11]["breakdown"]["cost_with_commercial_per_doz"], 29.07);
    }

    #[test]
    fn test_old_layout_log_only() {
        let store = MemoryBlobStore::new();
        store.set(HISTORY_KEY, &format!("[{}]", OLD_LAYOUT_ENTRY)).unwrap();

        let history = HistoryStore::new(&store);
        assert!(history.list().is_empty());

        let record = append_style(&history, "S-1");
        assert_eq!(history.list(), vec![record]);
        assert_eq!(raw_entries(&store).len(), 2);
    }

    #[test]
    fn test_cap_counts_unparsed_entries() {
        let store = MemoryBlobStore::new();
        let old: serde_json::Value = serde_json::from_str(OLD_LAYOUT_ENTRY).unwrap();
        let entries = vec![old; HISTORY_CAPACITY];
        store.set(HISTORY_KEY, &serde_json::to_string(&entries).unwrap()).unwrap();

        let history = HistoryStore::new(&store);
        append_style(&history, "S-1");

        assert_eq!(raw_entries(&store).len(), HISTORY_CAPACITY);
        assert_eq!(history.list().len(), 1);
    }

    #[test]
    fn test_require_missing_record() {
        let history = HistoryStore::new(MemoryBlobStore::new());
        append_style(&history, "S-1");

        let err = history.require("0").unwrap_err();
        assert_eq!(err, CostError::record_not_found("0"));
    }

    #[test]
    fn test_summaries() {
        let history = HistoryStore::new(MemoryBlobStore::new());
        let record = append_style(&history, "OX-22");

        let summaries = history.summaries();
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.id, record.id);
        assert_eq!(summary.style_name, "OX-22");
        assert_eq!(summary.buyer_name, "Buyer-B");
        assert_eq!(summary.garment_type, "Woven Shirt");
        assert_eq!(summary.final_fob_per_pc, 7.56);
        assert_eq!(summary.consumption_per_doz, 22.54);
        assert_eq!(summary.consumption_unit, "yd/doz");
        assert_eq!(summary.fabric_type, None);
        assert_eq!(summary.gsm, None);
    }

    #[test]
    fn test_knit_summary_carries_fabric() {
        let input: CostInput = serde_json::from_str(
            r#"{
                "garment_type": "tshirt", "style_name": "TS-9",
                "fabric_type": "Single Jersey", "gsm": 160,
                "body_length": 70, "sleeve_length": 22, "chest_width": 52,
                "wastage_percent": 10, "yarn_price_per_kg": 4.5,
                "knitting_charge_per_kg": 0.5, "dyeing_charge_per_kg": 1.2,
                "profit_margin_percent": 15
            }"#,
        )
        .unwrap();
        let breakdown = compute(&input).unwrap();
        let history = HistoryStore::new(MemoryBlobStore::new());
        history.append(input, breakdown).unwrap();

        let summary = &history.summaries()[0];
        assert_eq!(summary.fabric_type.as_deref(), Some("Single Jersey"));
        assert_eq!(summary.gsm, Some(160.0));
        assert_eq!(summary.consumption_unit, "kg/doz");
    }

    #[test]
    fn test_stored_format_is_plain_array() {
        let store = MemoryBlobStore::new();
        let history = HistoryStore::new(&store);
        let record = append_style(&history, "S-1");

        let raw = store.get(HISTORY_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"], record.id.as_str());
        assert_eq!(entries[0]["inputs"]["garment_type"], "shirt");
        assert!(entries[0]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_reads_externally_written_log() {
        let raw = r#"[{
            "id": "1718000000000",
            "timestamp": "2024-06-10T06:13:20.000Z",
            "inputs": {
                "style_name": "Style-001", "buyer_name": "Buyer-A", "season": "Summer 24",
                "fabric_type": "Single Jersey", "gsm": 160,
                "body_length": 70, "sleeve_length": 22, "chest_width": 52,
                "wastage_percent": 10, "yarn_price_per_kg": 4.5,
                "knitting_charge_per_kg": 0.5, "dyeing_charge_per_kg": 1.2,
                "profit_margin_percent": 15
            },
            "breakdown": {
                "garment_type": "T-Shirt (Knit)", "length_cm": 96, "width_cm": 55,
                "basic_consumption_kg_doz": 2.0275, "total_fabric_req_kg_doz": 2.2303,
                "fabric_rate_per_kg": 6.2, "fabric_cost_per_doz": 13.83,
                "fabric_cost_per_pc": 1.15, "piece_costs_per_pc": 0,
                "total_cost_per_pc": 1.15, "final_fob_per_pc": 1.33
            }
        }]"#;
        let store = MemoryBlobStore::new();
        store.set(HISTORY_KEY, raw).unwrap();

        let history = HistoryStore::new(&store);
        let log = history.list();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].inputs.garment_type(), crate::calculations::GarmentType::TShirt);
        assert_eq!(log[0].summary().consumption_unit, "kg/doz");

        // New appends land ahead of the existing entry with a larger id
        let record = append_style(&history, "S-2");
        let log = history.list();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].id, record.id);
        assert_eq!(log[1].id, "1718000000000");
    }

    #[test]
    fn test_file_backed_history_persists() {
        let dir = TempDir::new().unwrap();
        let record = {
            let history = HistoryStore::new(FileBlobStore::new(dir.path()));
            append_style(&history, "S-1")
        };

        let reopened = HistoryStore::new(FileBlobStore::new(dir.path()));
        assert_eq!(reopened.list(), vec![record]);
    }

    #[test]
    fn test_next_id_bumps_past_newest() {
        let now = Utc::now();

        let newest = (now.timestamp_millis() + 1000).to_string();
        let id: i64 = next_id(now, Some(newest.as_str())).parse().unwrap();
        assert_eq!(id, now.timestamp_millis() + 1001);

        assert_eq!(next_id(now, Some("legacy-id")), now.timestamp_millis().to_string());
        assert_eq!(next_id(now, None), now.timestamp_millis().to_string());
    }
}
