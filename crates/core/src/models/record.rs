use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::metrics::PositionMetrics;
use super::transaction::Transaction;

/// A saved simulation: one history entry, frozen at save time.
///
/// Unrecognized JSON fields are retained in `extra`, so loading and
/// re-persisting a record written by a newer schema never drops data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSimulation {
    /// Unique, monotonically increasing id derived from the save
    /// timestamp in milliseconds.
    pub id: i64,

    /// When the record was saved.
    pub saved_at: DateTime<Utc>,

    /// Schema version the record is currently at. Empty for data that
    /// predates versioning; migration stamps it to the current version.
    #[serde(default)]
    pub schema_version: String,

    pub name: String,

    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub projected_sell_price: String,

    /// Metrics computed at the moment of saving. Never recomputed
    /// afterwards. Always `Some` for records written by this version;
    /// `None` is tolerated from older data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PositionMetrics>,

    /// Fields from schemas we don't recognize, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
